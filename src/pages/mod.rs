//! Page objects
//!
//! One type per application screen. Pages never construct each other: a
//! transition asks the [`Navigator`] in its [`PageContext`] for the
//! destination, so the page graph is expressed through the registry rather
//! than through direct dependencies between page modules.

pub mod account_created;
pub mod account_deleted;
pub mod cart;
pub mod checkout;
pub mod contact_us;
pub mod home;
pub mod login;
pub mod order_placed;
pub mod payment;
pub mod product_details;
pub mod products;
pub mod signup;
pub mod test_cases;

pub use account_created::AccountCreatedPage;
pub use account_deleted::AccountDeletedPage;
pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use contact_us::{ContactForm, ContactUsPage};
pub use home::HomePage;
pub use login::{LoginPage, SignupOutcome};
pub use order_placed::OrderPlacedPage;
pub use payment::PaymentPage;
pub use product_details::{ProductDetailsPage, ProductInfo};
pub use products::ProductsPage;
pub use signup::SignUpPage;
pub use test_cases::TestCasesPage;

use crate::components::{CartModal, CategorySidebar, Footer, Header, ProductGrid, ScrollUp};
use crate::error::{Error, Result};
use crate::interaction::Interactor;
use crate::navigator::Navigator;
use crate::Locator;
use async_trait::async_trait;
use phf::phf_map;
use std::any::Any;
use std::fmt;

/// Identity of an application screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    Login,
    SignUp,
    AccountCreated,
    AccountDeleted,
    Products,
    ProductDetails,
    Cart,
    Checkout,
    Payment,
    OrderPlaced,
    ContactUs,
    TestCases,
}

static PATHS: phf::Map<&'static str, PageId> = phf_map! {
    "/" => PageId::Home,
    "/login" => PageId::Login,
    "/signup" => PageId::SignUp,
    "/account_created" => PageId::AccountCreated,
    "/delete_account" => PageId::AccountDeleted,
    "/products" => PageId::Products,
    "/view_cart" => PageId::Cart,
    "/checkout" => PageId::Checkout,
    "/payment" => PageId::Payment,
    "/contact_us" => PageId::ContactUs,
    "/test_cases" => PageId::TestCases,
};

/// Paths that carry an id or a name after the prefix
const PREFIXES: &[(&str, PageId)] = &[
    ("/product_details/", PageId::ProductDetails),
    ("/payment_done/", PageId::OrderPlaced),
    ("/category_products/", PageId::Products),
    ("/brand_products/", PageId::Products),
];

impl PageId {
    pub const ALL: [PageId; 13] = [
        PageId::Home,
        PageId::Login,
        PageId::SignUp,
        PageId::AccountCreated,
        PageId::AccountDeleted,
        PageId::Products,
        PageId::ProductDetails,
        PageId::Cart,
        PageId::Checkout,
        PageId::Payment,
        PageId::OrderPlaced,
        PageId::ContactUs,
        PageId::TestCases,
    ];

    /// URL path of the screen; a prefix for screens addressed by id
    pub fn path(self) -> &'static str {
        match self {
            PageId::Home => "/",
            PageId::Login => "/login",
            PageId::SignUp => "/signup",
            PageId::AccountCreated => "/account_created",
            PageId::AccountDeleted => "/delete_account",
            PageId::Products => "/products",
            PageId::ProductDetails => "/product_details/",
            PageId::Cart => "/view_cart",
            PageId::Checkout => "/checkout",
            PageId::Payment => "/payment",
            PageId::OrderPlaced => "/payment_done/",
            PageId::ContactUs => "/contact_us",
            PageId::TestCases => "/test_cases",
        }
    }

    /// Screen served at `path`. Query strings and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Option<PageId> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        if let Some(id) = PATHS.get(path) {
            return Some(*id);
        }
        if let Some(id) = PREFIXES
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix) && path.len() > prefix.len())
            .map(|(_, id)| *id)
        {
            return Some(id);
        }
        match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => PATHS.get(trimmed).copied(),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What every page and component is built from
#[derive(Debug, Clone)]
pub struct PageContext {
    navigator: Navigator,
}

impl PageContext {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn ui(&self) -> &Interactor {
        self.navigator.interactor()
    }
}

/// One application screen
///
/// Every page exposes the same fixed component set whether or not the screen
/// renders all of it; using an absent component times out like any other
/// missing element.
#[async_trait]
pub trait Page: Send + Sync + fmt::Debug + 'static {
    const ID: PageId;

    fn new(ctx: PageContext) -> Self
    where
        Self: Sized;

    fn context(&self) -> &PageContext;

    /// Element whose visibility identifies the screen
    fn landmark(&self) -> Locator;

    /// Whether the landmark becomes visible within the timeout
    async fn is_open(&self) -> bool {
        self.context().ui().is_visible(&self.landmark()).await
    }

    fn header(&self) -> Header {
        Header::new(self.context().clone())
    }

    fn footer(&self) -> Footer {
        Footer::new(self.context().clone())
    }

    fn product_grid(&self) -> ProductGrid {
        ProductGrid::new(self.context().clone())
    }

    fn cart_modal(&self) -> CartModal {
        CartModal::new(self.context().clone())
    }

    fn category_sidebar(&self) -> CategorySidebar {
        CategorySidebar::new(self.context().clone())
    }

    fn scroll_up(&self) -> ScrollUp {
        ScrollUp::new(self.context().clone())
    }
}

/// Object-safe view of any page, as produced by the registry
#[async_trait]
pub trait AnyPage: Send + Sync + fmt::Debug {
    fn id(&self) -> PageId;

    fn page_context(&self) -> &PageContext;

    async fn is_displayed(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

#[async_trait]
impl<P: Page> AnyPage for P {
    fn id(&self) -> PageId {
        P::ID
    }

    fn page_context(&self) -> &PageContext {
        self.context()
    }

    async fn is_displayed(&self) -> bool {
        self.is_open().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl dyn AnyPage {
    pub fn is<P: Page>(&self) -> bool {
        self.as_any().is::<P>()
    }

    pub fn downcast_ref<P: Page>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }

    /// Recover the concrete page type
    pub fn downcast<P: Page>(self: Box<Self>) -> Result<P> {
        let id = self.id();
        self.into_any()
            .downcast::<P>()
            .map(|page| *page)
            .map_err(|_| Error::internal(format!("{} page is not a {} page", id, P::ID)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_paths_resolve() {
        for id in PageId::ALL {
            if !id.path().ends_with('/') || id == PageId::Home {
                assert_eq!(PageId::from_path(id.path()), Some(id), "{}", id);
            }
        }
    }

    #[test]
    fn test_prefixed_paths_resolve() {
        assert_eq!(PageId::from_path("/product_details/1"), Some(PageId::ProductDetails));
        assert_eq!(PageId::from_path("/payment_done/500"), Some(PageId::OrderPlaced));
        assert_eq!(PageId::from_path("/category_products/3"), Some(PageId::Products));
        assert_eq!(PageId::from_path("/product_details/"), None);
    }

    #[test]
    fn test_query_and_trailing_slash_are_ignored() {
        assert_eq!(PageId::from_path("/products?search=top"), Some(PageId::Products));
        assert_eq!(PageId::from_path("/view_cart/"), Some(PageId::Cart));
        assert_eq!(PageId::from_path("/nowhere"), None);
    }
}
