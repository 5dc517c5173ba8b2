//! Address review and order summary before payment

use super::{Page, PageContext, PageId, PaymentPage};
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CheckoutPage {
    ctx: PageContext,
}

impl CheckoutPage {
    pub const DELIVERY_LABEL: Locator =
        Locator::xpath("//h3[normalize-space()='Your delivery address']");
    pub const BILLING_LABEL: Locator =
        Locator::xpath("//h3[normalize-space()='Your billing address']");
    pub const ADDRESS_BLOCKS: Locator = Locator::css("ul.address");
    pub const DELIVERY_LINES: Locator = Locator::css("#address_delivery li");
    pub const BILLING_LINES: Locator = Locator::css("#address_invoice li");
    pub const REVIEW_ORDER: Locator = Locator::xpath("//h2[normalize-space()='Review Your Order']");
    pub const ORDER_ROWS: Locator = Locator::xpath("//tr[contains(@id,'product')]");
    pub const COMMENT: Locator = Locator::xpath("//textarea[@name='message']");
    pub const PLACE_ORDER: Locator = Locator::xpath("//a[normalize-space()='Place Order']");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    /// Both address headings and at least two address blocks are shown
    pub async fn is_address_details_visible(&self) -> Result<bool> {
        info!("Verifying address details");
        Ok(self.ui().is_visible(&Self::DELIVERY_LABEL).await
            && self.ui().is_visible(&Self::BILLING_LABEL).await
            && self.ui().find_all(&Self::ADDRESS_BLOCKS).await?.len() >= 2)
    }

    /// The order summary heading and at least one product row are shown
    pub async fn is_review_order_visible(&self) -> Result<bool> {
        Ok(self.ui().is_visible(&Self::REVIEW_ORDER).await
            && !self.ui().find_all(&Self::ORDER_ROWS).await?.is_empty())
    }

    pub async fn is_checkout_page_valid(&self) -> Result<bool> {
        Ok(self.is_address_details_visible().await? && self.is_review_order_visible().await?)
    }

    pub async fn delivery_address(&self) -> Result<Vec<String>> {
        self.ui().read_texts(&Self::DELIVERY_LINES).await
    }

    pub async fn billing_address(&self) -> Result<Vec<String>> {
        self.ui().read_texts(&Self::BILLING_LINES).await
    }

    pub async fn enter_comment(&self, comment: &str) -> Result<()> {
        info!("Entering order comment");
        self.ui().type_text(&Self::COMMENT, comment).await
    }

    pub async fn place_order(&self) -> Result<PaymentPage> {
        info!("Placing order");
        self.ui().click(&Self::PLACE_ORDER).await?;
        Ok(self.ctx.navigator().payment_page())
    }
}

impl Page for CheckoutPage {
    const ID: PageId = PageId::Checkout;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::REVIEW_ORDER
    }
}
