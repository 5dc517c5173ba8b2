//! Site header: navigation links and the logged-in label

use crate::error::Result;
use crate::interaction::Interactor;
use crate::pages::{
    AccountDeletedPage, CartPage, ContactUsPage, HomePage, LoginPage, PageContext, ProductsPage,
    TestCasesPage,
};
use crate::Locator;
use tracing::{info, instrument};

const LOGGED_IN_PREFIX: &str = "Logged in as";

#[derive(Debug, Clone)]
pub struct Header {
    ctx: PageContext,
}

impl Header {
    pub const CONTAINER: Locator = Locator::css(".header-middle");
    pub const HOME: Locator = Locator::css(".shop-menu a[href='/']");
    pub const SIGNUP_LOGIN: Locator = Locator::css("a[href='/login']");
    pub const LOGOUT: Locator = Locator::css("a[href='/logout']");
    pub const DELETE_ACCOUNT: Locator = Locator::css("a[href='/delete_account']");
    pub const CONTACT_US: Locator = Locator::css("a[href='/contact_us']");
    pub const TEST_CASES: Locator = Locator::xpath("//a[contains(text(),'Test Cases')]");
    pub const PRODUCTS: Locator = Locator::xpath("//a[@href='/products']");
    pub const CART: Locator = Locator::css("a[href='/view_cart']");
    pub const LOGGED_USER: Locator = Locator::xpath("//li[a[contains(., 'Logged in as')]]");

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_visible(&self) -> bool {
        info!("Checking header visibility");
        self.ui().is_visible(&Self::CONTAINER).await
    }

    pub async fn is_logged_user_visible(&self) -> bool {
        self.ui().is_visible(&Self::LOGGED_USER).await
    }

    /// Name shown after "Logged in as", when someone is logged in
    pub async fn logged_in_user(&self) -> Result<Option<String>> {
        if !self.ui().is_visible(&Self::LOGGED_USER).await {
            return Ok(None);
        }
        let label = self.ui().read_text(&Self::LOGGED_USER).await?;
        let name = label
            .split_once(LOGGED_IN_PREFIX)
            .map_or(label.as_str(), |(_, rest)| rest)
            .trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    pub async fn is_logged_in_as(&self, username: &str) -> bool {
        matches!(self.logged_in_user().await, Ok(Some(name)) if name == username)
    }

    #[instrument(skip(self))]
    pub async fn click_home(&self) -> Result<HomePage> {
        self.ui().click(&Self::HOME).await?;
        Ok(self.ctx.navigator().home_page())
    }

    #[instrument(skip(self))]
    pub async fn click_signup_login(&self) -> Result<LoginPage> {
        info!("Clicking Signup / Login");
        self.ui().click(&Self::SIGNUP_LOGIN).await?;
        Ok(self.ctx.navigator().login_page())
    }

    #[instrument(skip(self))]
    pub async fn click_logout(&self) -> Result<LoginPage> {
        info!("Clicking Logout");
        self.ui().click(&Self::LOGOUT).await?;
        Ok(self.ctx.navigator().login_page())
    }

    #[instrument(skip(self))]
    pub async fn click_delete_account(&self) -> Result<AccountDeletedPage> {
        info!("Clicking Delete Account");
        self.ui().click(&Self::DELETE_ACCOUNT).await?;
        Ok(self.ctx.navigator().account_deleted_page())
    }

    #[instrument(skip(self))]
    pub async fn click_contact_us(&self) -> Result<ContactUsPage> {
        self.ui().click(&Self::CONTACT_US).await?;
        Ok(self.ctx.navigator().contact_us_page())
    }

    #[instrument(skip(self))]
    pub async fn click_test_cases(&self) -> Result<TestCasesPage> {
        self.ui().click(&Self::TEST_CASES).await?;
        Ok(self.ctx.navigator().test_cases_page())
    }

    #[instrument(skip(self))]
    pub async fn click_products(&self) -> Result<ProductsPage> {
        info!("Clicking Products");
        self.ui().click(&Self::PRODUCTS).await?;
        Ok(self.ctx.navigator().products_page())
    }

    #[instrument(skip(self))]
    pub async fn click_cart(&self) -> Result<CartPage> {
        info!("Clicking Cart");
        self.ui().click(&Self::CART).await?;
        Ok(self.ctx.navigator().cart_page())
    }
}
