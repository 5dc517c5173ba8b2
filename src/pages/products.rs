//! Product listing, search and bulk add-to-cart

use super::{Page, PageContext, PageId, ProductDetailsPage};
use crate::components::CartModal;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ProductsPage {
    ctx: PageContext,
}

impl ProductsPage {
    pub const ALL_PRODUCTS_TITLE: Locator = Locator::xpath("//h2[normalize-space()='All Products']");
    pub const PRODUCT_ITEMS: Locator = Locator::xpath("//div[@class='single-products']");
    pub const SEARCH_INPUT: Locator = Locator::id("search_product");
    pub const SEARCH_BUTTON: Locator = Locator::id("submit_search");
    pub const SEARCHED_TITLE: Locator =
        Locator::xpath("//h2[normalize-space()='Searched Products']");
    pub const PRODUCT_NAMES: Locator = Locator::css(".productinfo p");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_products_page_visible(&self) -> bool {
        self.ui().is_visible(&Self::ALL_PRODUCTS_TITLE).await
    }

    pub async fn is_products_list_visible(&self) -> bool {
        self.ui().is_visible(&Self::PRODUCT_ITEMS).await
    }

    pub async fn is_searched_products_visible(&self) -> bool {
        self.ui().is_visible(&Self::SEARCHED_TITLE).await
    }

    #[instrument(skip(self))]
    pub async fn search_product(&self, term: &str) -> Result<()> {
        info!("Searching for {:?}", term);
        self.ui().type_text(&Self::SEARCH_INPUT, term).await?;
        self.ui().click(&Self::SEARCH_BUTTON).await
    }

    /// Names of the product cards currently listed
    pub async fn displayed_product_names(&self) -> Result<Vec<String>> {
        self.ui().read_texts(&Self::PRODUCT_NAMES).await
    }

    /// Whether every listed name contains `keyword`, ignoring case.
    /// An empty listing does not count as related.
    pub async fn are_all_products_related_to(&self, keyword: &str) -> Result<bool> {
        let names = self.displayed_product_names().await?;
        let keyword = keyword.to_lowercase();
        Ok(!names.is_empty() && names.iter().all(|n| n.to_lowercase().contains(&keyword)))
    }

    pub async fn view_product(&self, name: &str) -> Result<ProductDetailsPage> {
        self.product_grid().view_product(name).await
    }

    pub async fn add_product_to_cart(&self, name: &str) -> Result<CartModal> {
        self.product_grid().add_to_cart(name).await
    }

    /// Add every listed product; the modal of the last one stays open.
    /// Returns how many products were added.
    #[instrument(skip(self))]
    pub async fn add_all_displayed_products_to_cart(&self) -> Result<usize> {
        let names = self.displayed_product_names().await?;
        info!("Adding {} products to cart", names.len());
        for (i, name) in names.iter().enumerate() {
            let modal = self.add_product_to_cart(name).await?;
            if i + 1 < names.len() {
                modal.continue_shopping().await?;
            }
        }
        Ok(names.len())
    }
}

impl Page for ProductsPage {
    const ID: PageId = PageId::Products;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::PRODUCT_ITEMS
    }
}
