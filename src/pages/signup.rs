//! Account information form

use super::{AccountCreatedPage, Page, PageContext, PageId};
use crate::data::UserProfile;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct SignUpPage {
    ctx: PageContext,
}

impl SignUpPage {
    pub const ACCOUNT_INFO_LABEL: Locator =
        Locator::xpath("//b[normalize-space()='Enter Account Information']");
    pub const TITLE_MR: Locator = Locator::id("id_gender1");
    pub const TITLE_MRS: Locator = Locator::id("id_gender2");
    pub const NAME: Locator = Locator::id("name");
    pub const EMAIL: Locator = Locator::id("email");
    pub const PASSWORD: Locator = Locator::id("password");
    pub const BIRTH_DAY: Locator = Locator::id("days");
    pub const BIRTH_MONTH: Locator = Locator::id("months");
    pub const BIRTH_YEAR: Locator = Locator::id("years");
    pub const NEWSLETTER: Locator = Locator::id("newsletter");
    pub const OFFERS: Locator = Locator::id("optin");
    pub const FIRST_NAME: Locator = Locator::id("first_name");
    pub const LAST_NAME: Locator = Locator::id("last_name");
    pub const COMPANY: Locator = Locator::id("company");
    pub const ADDRESS1: Locator = Locator::id("address1");
    pub const ADDRESS2: Locator = Locator::id("address2");
    pub const COUNTRY: Locator = Locator::id("country");
    pub const STATE: Locator = Locator::id("state");
    pub const CITY: Locator = Locator::id("city");
    pub const ZIPCODE: Locator = Locator::id("zipcode");
    pub const MOBILE_NUMBER: Locator = Locator::id("mobile_number");
    pub const CREATE_ACCOUNT: Locator =
        Locator::xpath("//button[contains(text(),'Create Account')]");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn enter_account_information_message(&self) -> Result<String> {
        self.ui().read_text(&Self::ACCOUNT_INFO_LABEL).await
    }

    /// Name carried over from the signup form
    pub async fn prefilled_name(&self) -> Result<String> {
        Ok(self
            .ui()
            .read_attribute(&Self::NAME, "value")
            .await?
            .unwrap_or_default())
    }

    /// Email carried over from the signup form
    pub async fn prefilled_email(&self) -> Result<String> {
        Ok(self
            .ui()
            .read_attribute(&Self::EMAIL, "value")
            .await?
            .unwrap_or_default())
    }

    pub async fn select_title(&self, title: &str) -> Result<()> {
        match title.to_lowercase().as_str() {
            "mr" => self.ui().click(&Self::TITLE_MR).await,
            "mrs" => self.ui().click(&Self::TITLE_MRS).await,
            other => {
                debug!("No title radio for {:?}", other);
                Ok(())
            }
        }
    }

    async fn set_checkbox(&self, locator: &Locator, checked: bool) -> Result<()> {
        if self.ui().is_selected(locator).await? != checked {
            self.ui().click(locator).await?;
        }
        Ok(())
    }

    /// Fill the "Enter Account Information" section
    #[instrument(skip_all)]
    pub async fn fill_account_information(&self, profile: &UserProfile) -> Result<()> {
        info!("Filling account information");
        let dob = &profile.date_of_birth;
        self.select_title(&profile.title).await?;
        self.ui().type_text(&Self::PASSWORD, &profile.password).await?;
        self.ui().select_by_value(&Self::BIRTH_DAY, &dob.day).await?;
        self.ui().select_by_value(&Self::BIRTH_MONTH, &dob.month).await?;
        self.ui().select_by_value(&Self::BIRTH_YEAR, &dob.year).await?;
        self.set_checkbox(&Self::NEWSLETTER, profile.newsletter).await?;
        self.set_checkbox(&Self::OFFERS, profile.special_offers).await
    }

    /// Fill the "Address Information" section
    #[instrument(skip_all)]
    pub async fn fill_address_information(&self, profile: &UserProfile) -> Result<()> {
        info!("Filling address information");
        let person = &profile.personal_info;
        let address = &profile.address;
        self.ui().type_text(&Self::FIRST_NAME, &person.first_name).await?;
        self.ui().type_text(&Self::LAST_NAME, &person.last_name).await?;
        self.ui().type_text(&Self::COMPANY, &person.company).await?;
        self.ui().type_text(&Self::ADDRESS1, &address.address1).await?;
        self.ui().type_text(&Self::ADDRESS2, &address.address2).await?;
        self.ui().select_by_value(&Self::COUNTRY, &address.country).await?;
        self.ui().type_text(&Self::STATE, &address.state).await?;
        self.ui().type_text(&Self::CITY, &address.city).await?;
        self.ui().type_text(&Self::ZIPCODE, &address.zipcode).await?;
        self.ui()
            .type_text(&Self::MOBILE_NUMBER, &profile.contact.mobile_number)
            .await
    }

    pub async fn click_create_account(&self) -> Result<AccountCreatedPage> {
        info!("Clicking Create Account");
        self.ui().click(&Self::CREATE_ACCOUNT).await?;
        Ok(self.ctx.navigator().account_created_page())
    }

    /// Fill both sections and submit
    pub async fn create_account(&self, profile: &UserProfile) -> Result<AccountCreatedPage> {
        self.fill_account_information(profile).await?;
        self.fill_address_information(profile).await?;
        self.click_create_account().await
    }
}

impl Page for SignUpPage {
    const ID: PageId = PageId::SignUp;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::ACCOUNT_INFO_LABEL
    }
}
