//! Card payment form

use super::{OrderPlacedPage, Page, PageContext, PageId};
use crate::data::PaymentCard;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct PaymentPage {
    ctx: PageContext,
}

impl PaymentPage {
    pub const NAME_ON_CARD: Locator = Locator::xpath("//input[@name='name_on_card']");
    pub const CARD_NUMBER: Locator = Locator::xpath("//input[@name='card_number']");
    pub const CVC: Locator = Locator::xpath("//input[contains(@class,'card-cvc')]");
    pub const EXPIRY_MONTH: Locator = Locator::xpath("//input[contains(@class,'card-expiry-month')]");
    pub const EXPIRY_YEAR: Locator = Locator::xpath("//input[contains(@class,'card-expiry-year')]");
    pub const PAY_AND_CONFIRM: Locator = Locator::xpath("//button[@id='submit']");
    pub const SUCCESS_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'alert-success alert')]");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    #[instrument(skip_all)]
    pub async fn enter_payment_details(&self, card: &PaymentCard) -> Result<()> {
        info!("Filling payment details");
        self.ui().type_text(&Self::NAME_ON_CARD, &card.name_on_card).await?;
        self.ui().type_text(&Self::CARD_NUMBER, &card.card_number).await?;
        self.ui().type_text(&Self::CVC, &card.cvc).await?;
        self.ui().type_text(&Self::EXPIRY_MONTH, &card.expiry_month).await?;
        self.ui().type_text(&Self::EXPIRY_YEAR, &card.expiry_year).await
    }

    pub async fn click_pay_and_confirm(&self) -> Result<OrderPlacedPage> {
        info!("Paying and confirming order");
        self.ui().click(&Self::PAY_AND_CONFIRM).await?;
        Ok(self.ctx.navigator().order_placed_page())
    }

    pub async fn pay(&self, card: &PaymentCard) -> Result<OrderPlacedPage> {
        self.enter_payment_details(card).await?;
        self.click_pay_and_confirm().await
    }

    /// Confirmation flashed before the redirect to the order page
    pub async fn success_message(&self) -> Result<String> {
        self.ui().read_text(&Self::SUCCESS_MESSAGE).await
    }
}

impl Page for PaymentPage {
    const ID: PageId = PageId::Payment;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::NAME_ON_CARD
    }
}
