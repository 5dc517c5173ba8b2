//! Shopping cart

use super::{CheckoutPage, LoginPage, Page, PageContext, PageId};
use crate::error::Result;
use crate::interaction::Interactor;
use crate::locator::xpath_literal;
use crate::{By, Locator};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct CartPage {
    ctx: PageContext,
}

/// Numeric amount of a price label such as "Rs. 1,500"
fn parse_amount(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

impl CartPage {
    pub const BREADCRUMB: Locator =
        Locator::xpath("//li[@class='active' and normalize-space()='Shopping Cart']");
    pub const TABLE: Locator = Locator::id("cart_info_table");
    pub const ROWS: Locator = Locator::xpath("//tbody/tr[starts-with(@id,'product-')]");
    pub const ITEM_NAMES: Locator = Locator::xpath("//td[@class='cart_description']/h4/a");
    pub const PROCEED_TO_CHECKOUT: Locator =
        Locator::xpath("//a[normalize-space()='Proceed To Checkout']");
    pub const CHECKOUT_MODAL: Locator = Locator::id("checkoutModal");
    pub const REGISTER_LOGIN: Locator = Locator::xpath("//u[normalize-space()='Register / Login']");

    fn row_xpath(name: &str) -> String {
        format!(
            "//tr[starts-with(@id,'product-')][.//td[@class='cart_description']/h4/a[normalize-space()={}]]",
            xpath_literal(name)
        )
    }

    pub fn row(name: &str) -> Locator {
        Locator::dynamic(By::XPath, Self::row_xpath(name))
    }

    pub fn quantity_cell(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!("{}//td[@class='cart_quantity']/button", Self::row_xpath(name)),
        )
    }

    pub fn price_cell(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!("{}//td[@class='cart_price']/p", Self::row_xpath(name)),
        )
    }

    pub fn total_cell(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!("{}//td[@class='cart_total']/p", Self::row_xpath(name)),
        )
    }

    pub fn delete_button(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!("{}//a[@class='cart_quantity_delete']", Self::row_xpath(name)),
        )
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_cart_page_visible(&self) -> bool {
        self.ui().is_visible(&Self::BREADCRUMB).await
    }

    pub async fn is_cart_table_visible(&self) -> bool {
        self.ui().is_visible(&Self::TABLE).await
    }

    /// Number of product rows; zero once the timeout passes with none
    pub async fn cart_item_count(&self) -> Result<usize> {
        Ok(self.ui().find_all(&Self::ROWS).await?.len())
    }

    pub async fn item_names(&self) -> Result<Vec<String>> {
        self.ui().read_texts(&Self::ITEM_NAMES).await
    }

    pub async fn quantity_of_item(&self, name: &str) -> Result<String> {
        self.ui().read_text(&Self::quantity_cell(name)).await
    }

    pub async fn is_item_visible(&self, name: &str) -> bool {
        self.ui().is_visible(&Self::row(name)).await
    }

    /// Whether every name in `names` has a row
    pub async fn are_products_in_cart<S: AsRef<str>>(&self, names: &[S]) -> Result<bool> {
        let in_cart = self.item_names().await?;
        let missing: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| !in_cart.iter().any(|c| c == n))
            .collect();
        if !missing.is_empty() {
            warn!("Missing from cart: {:?}", missing);
        }
        Ok(missing.is_empty())
    }

    /// Whether the row total of `name` equals price times quantity
    pub async fn is_item_total_correct(&self, name: &str) -> Result<bool> {
        let price = self.ui().read_text(&Self::price_cell(name)).await?;
        let quantity = self.quantity_of_item(name).await?;
        let total = self.ui().read_text(&Self::total_cell(name)).await?;

        let expected = parse_amount(&price).zip(parse_amount(&quantity)).map(|(p, q)| p * q);
        let correct = expected.is_some() && expected == parse_amount(&total);
        if !correct {
            warn!(
                "Total of {} is {:?}, price {:?} x quantity {:?}",
                name, total, price, quantity
            );
        }
        Ok(correct)
    }

    pub async fn are_all_cart_items_price_quantity_correct(&self) -> Result<bool> {
        let names = self.item_names().await?;
        if names.is_empty() {
            return Ok(false);
        }
        for name in &names {
            if !self.is_item_total_correct(name).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, name: &str) -> Result<()> {
        info!("Removing {} from cart", name);
        self.ui().click(&Self::delete_button(name)).await
    }

    /// Whether the row of `name` disappears within the timeout
    pub async fn is_item_removed(&self, name: &str) -> bool {
        match self.ui().wait_until_gone(&Self::row(name)).await {
            Ok(gone) => gone,
            Err(e) => {
                warn!("Could not confirm removal of {}: {}", name, e);
                false
            }
        }
    }

    /// Click "Proceed To Checkout". A guest gets the register/login dialog
    /// instead of the checkout page.
    pub async fn proceed_to_checkout(&self) -> Result<CheckoutPage> {
        info!("Proceeding to checkout");
        self.ui().click(&Self::PROCEED_TO_CHECKOUT).await?;
        Ok(self.ctx.navigator().checkout_page())
    }

    pub async fn is_checkout_modal_visible(&self) -> bool {
        self.ui().is_visible(&Self::CHECKOUT_MODAL).await
    }

    pub async fn click_register_login(&self) -> Result<LoginPage> {
        self.ui().click(&Self::REGISTER_LOGIN).await?;
        Ok(self.ctx.navigator().login_page())
    }
}

impl Page for CartPage {
    const ID: PageId = PageId::Cart;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::BREADCRUMB
    }
}
