//! Application controller
//!
//! The [`Navigator`] is the single place page objects are constructed. Every
//! accessor builds a fresh page bound to the same session; nothing is cached,
//! so "the current page" is whatever the calling test last received.

use crate::config::Config;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::pages::*;
use crate::session::SessionHandle;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument};

/// Constructor stored in the page registry
pub type PageConstructor = fn(PageContext) -> Box<dyn AnyPage>;

fn construct<P: Page>(ctx: PageContext) -> Box<dyn AnyPage> {
    Box::new(P::new(ctx))
}

fn registry() -> &'static HashMap<PageId, PageConstructor> {
    static REGISTRY: OnceLock<HashMap<PageId, PageConstructor>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries: [(PageId, PageConstructor); 13] = [
            (HomePage::ID, construct::<HomePage> as PageConstructor),
            (LoginPage::ID, construct::<LoginPage> as PageConstructor),
            (SignUpPage::ID, construct::<SignUpPage> as PageConstructor),
            (AccountCreatedPage::ID, construct::<AccountCreatedPage> as PageConstructor),
            (AccountDeletedPage::ID, construct::<AccountDeletedPage> as PageConstructor),
            (ProductsPage::ID, construct::<ProductsPage> as PageConstructor),
            (ProductDetailsPage::ID, construct::<ProductDetailsPage> as PageConstructor),
            (CartPage::ID, construct::<CartPage> as PageConstructor),
            (CheckoutPage::ID, construct::<CheckoutPage> as PageConstructor),
            (PaymentPage::ID, construct::<PaymentPage> as PageConstructor),
            (OrderPlacedPage::ID, construct::<OrderPlacedPage> as PageConstructor),
            (ContactUsPage::ID, construct::<ContactUsPage> as PageConstructor),
            (TestCasesPage::ID, construct::<TestCasesPage> as PageConstructor),
        ];
        entries.into_iter().collect()
    })
}

/// Factory for every page object of one session
#[derive(Debug, Clone)]
pub struct Navigator {
    ui: Interactor,
    base_url: Arc<str>,
}

impl Navigator {
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            ui,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Navigator using the timeouts, retry policy and base URL of `config`
    pub fn from_config(session: SessionHandle, config: &Config) -> Self {
        let ui = Interactor::new(session, config.wait_timeouts(), config.retry_policy());
        Self::new(ui, config.base_url.clone())
    }

    pub fn interactor(&self) -> &Interactor {
        &self.ui
    }

    pub fn session(&self) -> &SessionHandle {
        self.ui.session()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path` on the storefront
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn context(&self) -> PageContext {
        PageContext::new(self.clone())
    }

    /// Navigate the session to `url` and return the entry page
    #[instrument(skip(self))]
    pub async fn open(&self, url: &str) -> Result<HomePage> {
        info!("Opening {}", url);
        self.ui.navigate_to(url).await?;
        Ok(self.home_page())
    }

    /// Navigate to the storefront root
    pub async fn open_site(&self) -> Result<HomePage> {
        self.open(&self.url_for("/")).await
    }

    /// Navigate straight to the path of `P` and return it
    pub async fn go_to<P: Page>(&self) -> Result<P> {
        self.ui.navigate_to(&self.url_for(P::ID.path())).await?;
        Ok(self.page::<P>())
    }

    /// Fresh page of type `P`
    pub fn page<P: Page>(&self) -> P {
        P::new(self.context())
    }

    /// Fresh page looked up by identity
    pub fn page_by_id(&self, id: PageId) -> Box<dyn AnyPage> {
        debug!("Constructing {} page", id);
        match registry().get(&id) {
            Some(constructor) => constructor(self.context()),
            // every PageId is registered; fall back to the entry page
            None => Box::new(self.home_page()),
        }
    }

    /// Page matching the session's current URL, if the path is known
    pub async fn current_page(&self) -> Result<Option<Box<dyn AnyPage>>> {
        let url = self.ui.current_url().await?;
        let path = match Url::parse(&url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url,
        };
        Ok(PageId::from_path(&path).map(|id| self.page_by_id(id)))
    }

    pub fn home_page(&self) -> HomePage {
        self.page()
    }

    pub fn login_page(&self) -> LoginPage {
        self.page()
    }

    pub fn signup_page(&self) -> SignUpPage {
        self.page()
    }

    pub fn account_created_page(&self) -> AccountCreatedPage {
        self.page()
    }

    pub fn account_deleted_page(&self) -> AccountDeletedPage {
        self.page()
    }

    pub fn products_page(&self) -> ProductsPage {
        self.page()
    }

    pub fn product_details_page(&self) -> ProductDetailsPage {
        self.page()
    }

    pub fn cart_page(&self) -> CartPage {
        self.page()
    }

    pub fn checkout_page(&self) -> CheckoutPage {
        self.page()
    }

    pub fn payment_page(&self) -> PaymentPage {
        self.page()
    }

    pub fn order_placed_page(&self) -> OrderPlacedPage {
        self.page()
    }

    pub fn contact_us_page(&self) -> ContactUsPage {
        self.page()
    }

    pub fn test_cases_page(&self) -> TestCasesPage {
        self.page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::interaction::RetryPolicy;
    use crate::session::Session;
    use crate::wait::Timeouts;

    fn navigator(driver: &MockDriver) -> (Session, Navigator) {
        let session = Session::start(Arc::new(driver.clone()));
        let ui = Interactor::new(session.handle(), Timeouts::default(), RetryPolicy::default());
        (session, Navigator::new(ui, "https://automationexercise.com/"))
    }

    #[test]
    fn test_every_page_is_registered() {
        for id in PageId::ALL {
            assert!(registry().contains_key(&id), "{} missing", id);
        }
    }

    #[tokio::test]
    async fn test_page_by_id_builds_matching_page() {
        let driver = MockDriver::new();
        let (_session, nav) = navigator(&driver);

        for id in PageId::ALL {
            assert_eq!(nav.page_by_id(id).id(), id);
        }
        let cart = nav.page_by_id(PageId::Cart).downcast::<CartPage>();
        assert!(cart.is_ok());
        let wrong = nav.page_by_id(PageId::Cart).downcast::<HomePage>();
        assert!(wrong.is_err());
    }

    #[tokio::test]
    async fn test_url_for_joins_base() {
        let driver = MockDriver::new();
        let (_session, nav) = navigator(&driver);
        assert_eq!(nav.url_for("/login"), "https://automationexercise.com/login");
        assert_eq!(nav.url_for("/"), "https://automationexercise.com/");
    }

    #[tokio::test]
    async fn test_current_page_follows_url() {
        let driver = MockDriver::new();
        let (_session, nav) = navigator(&driver);

        nav.go_to::<CartPage>().await.unwrap();
        let page = nav.current_page().await.unwrap().unwrap();
        assert_eq!(page.id(), PageId::Cart);

        nav.open("https://automationexercise.com/product_details/2").await.unwrap();
        let page = nav.current_page().await.unwrap().unwrap();
        assert!(page.is::<ProductDetailsPage>());
    }
}
