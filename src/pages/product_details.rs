//! Single product: details, quantity and reviews

use super::{CartPage, Page, PageContext, PageId};
use crate::components::CartModal;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::{info, instrument};

/// Text of the detail lines shown next to the product image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub name: String,
    pub category: String,
    pub price: String,
    pub availability: String,
    pub condition: String,
    pub brand: String,
}

#[derive(Debug, Clone)]
pub struct ProductDetailsPage {
    ctx: PageContext,
}

impl ProductDetailsPage {
    pub const INFORMATION: Locator = Locator::class_name("product-information");
    pub const NAME: Locator = Locator::css(".product-information h2");
    pub const CATEGORY: Locator = Locator::xpath("//p[contains(text(),'Category')]");
    pub const PRICE: Locator = Locator::xpath("//span[contains(text(),'Rs.')]");
    pub const AVAILABILITY: Locator = Locator::xpath("//p[b[contains(text(),'Availability')]]");
    pub const CONDITION: Locator = Locator::xpath("//p[b[normalize-space()='Condition:']]");
    pub const BRAND: Locator = Locator::xpath("//p[b[normalize-space()='Brand:']]");

    pub const QUANTITY: Locator = Locator::id("quantity");
    pub const ADD_TO_CART: Locator = Locator::css("button.cart");

    pub const REVIEW_TITLE: Locator = Locator::xpath("//a[normalize-space()='Write Your Review']");
    pub const REVIEW_NAME: Locator = Locator::id("name");
    pub const REVIEW_EMAIL: Locator = Locator::id("email");
    pub const REVIEW_CONTENT: Locator = Locator::id("review");
    pub const REVIEW_SUBMIT: Locator = Locator::id("button-review");
    pub const REVIEW_SUCCESS: Locator = Locator::css("#review-section .alert-success span");

    const DETAIL_LINES: [Locator; 6] = [
        Self::NAME,
        Self::CATEGORY,
        Self::PRICE,
        Self::AVAILABILITY,
        Self::CONDITION,
        Self::BRAND,
    ];

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_product_details_page_visible(&self) -> bool {
        self.is_open().await
    }

    /// Whether name, category, price, availability, condition and brand are
    /// all shown
    pub async fn are_product_details_visible(&self) -> bool {
        for locator in &Self::DETAIL_LINES {
            if !self.ui().is_visible(locator).await {
                info!("Product detail {} not visible", locator);
                return false;
            }
        }
        true
    }

    pub async fn product_name(&self) -> Result<String> {
        self.ui().read_text(&Self::NAME).await
    }

    pub async fn product_info(&self) -> Result<ProductInfo> {
        Ok(ProductInfo {
            name: self.ui().read_text(&Self::NAME).await?,
            category: self.ui().read_text(&Self::CATEGORY).await?,
            price: self.ui().read_text(&Self::PRICE).await?,
            availability: self.ui().read_text(&Self::AVAILABILITY).await?,
            condition: self.ui().read_text(&Self::CONDITION).await?,
            brand: self.ui().read_text(&Self::BRAND).await?,
        })
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(&self, quantity: &str) -> Result<()> {
        self.ui().type_text(&Self::QUANTITY, quantity).await
    }

    pub async fn click_add_to_cart(&self) -> Result<CartModal> {
        info!("Clicking Add to cart");
        self.ui().click(&Self::ADD_TO_CART).await?;
        Ok(self.cart_modal())
    }

    pub async fn add_to_cart_and_view_cart(&self) -> Result<CartPage> {
        self.click_add_to_cart().await?.view_cart().await
    }

    pub async fn is_review_section_visible(&self) -> bool {
        if self.ui().scroll_into_view(&Self::REVIEW_TITLE).await.is_err() {
            return false;
        }
        self.ui().is_visible(&Self::REVIEW_TITLE).await
    }

    #[instrument(skip(self, content))]
    pub async fn submit_review(&self, name: &str, email: &str, content: &str) -> Result<()> {
        info!("Submitting product review");
        self.ui().type_text(&Self::REVIEW_NAME, name).await?;
        self.ui().type_text(&Self::REVIEW_EMAIL, email).await?;
        self.ui().type_text(&Self::REVIEW_CONTENT, content).await?;
        self.ui().click(&Self::REVIEW_SUBMIT).await
    }

    pub async fn review_success_message(&self) -> Result<String> {
        self.ui().read_text(&Self::REVIEW_SUCCESS).await
    }
}

impl Page for ProductDetailsPage {
    const ID: PageId = PageId::ProductDetails;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::INFORMATION
    }
}
