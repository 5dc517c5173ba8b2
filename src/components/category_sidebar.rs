//! Left sidebar: category accordion and brand list

use crate::error::Result;
use crate::interaction::Interactor;
use crate::locator::xpath_literal;
use crate::pages::{PageContext, ProductsPage};
use crate::{By, Locator};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CategorySidebar {
    ctx: PageContext,
}

impl CategorySidebar {
    pub const CATEGORIES: Locator = Locator::xpath("//div[@id='accordian']");
    pub const BRANDS: Locator = Locator::css(".brands_products");
    pub const TITLE: Locator = Locator::xpath("//h2[@class='title text-center']");

    /// Top-level category toggle, e.g. "Women"
    pub fn category_toggle(category: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@id='accordian']//a[normalize-space()={}]",
                xpath_literal(category)
            ),
        )
    }

    /// Sub-category link inside an expanded category panel
    pub fn sub_category_link(category: &str, sub_category: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@id={}]//a[normalize-space()={}]",
                xpath_literal(category),
                xpath_literal(sub_category)
            ),
        )
    }

    /// Brand link; the visible text carries a product count prefix
    pub fn brand_link(brand: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@class='brands-name']//a[contains(normalize-space(),{})]",
                xpath_literal(brand)
            ),
        )
    }

    /// Title the listing shows for a category filter
    pub fn category_title(category: &str, sub_category: &str) -> String {
        format!(
            "{} - {} PRODUCTS",
            category.to_uppercase(),
            sub_category.to_uppercase()
        )
    }

    /// Title the listing shows for a brand filter
    pub fn brand_title(brand: &str) -> String {
        format!("BRAND - {} PRODUCTS", brand.to_uppercase())
    }

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_visible(&self) -> bool {
        info!("Checking category sidebar visibility");
        self.ui().is_visible(&Self::CATEGORIES).await
    }

    pub async fn are_brands_visible(&self) -> bool {
        self.ui().is_visible(&Self::BRANDS).await
    }

    /// Open a category; its sub-category links are revealed asynchronously
    #[instrument(skip(self))]
    pub async fn expand_category(&self, category: &str) -> Result<()> {
        info!("Expanding category {}", category);
        self.ui().click(&Self::category_toggle(category)).await
    }

    /// Expand `category` and open the listing of `sub_category`
    #[instrument(skip(self))]
    pub async fn click_sub_category(&self, category: &str, sub_category: &str) -> Result<ProductsPage> {
        self.expand_category(category).await?;
        info!("Clicking sub-category {}", sub_category);
        self.ui()
            .click(&Self::sub_category_link(category, sub_category))
            .await?;
        Ok(self.ctx.navigator().products_page())
    }

    #[instrument(skip(self))]
    pub async fn click_brand(&self, brand: &str) -> Result<ProductsPage> {
        info!("Clicking brand {}", brand);
        let link = Self::brand_link(brand);
        self.ui().scroll_into_view(&link).await?;
        self.ui().click(&link).await?;
        Ok(self.ctx.navigator().products_page())
    }

    pub async fn title(&self) -> Result<String> {
        self.ui().read_text(&Self::TITLE).await
    }

    pub async fn is_category_page_for(&self, category: &str, sub_category: &str) -> bool {
        let expected = Self::category_title(category, sub_category);
        matches!(self.title().await, Ok(actual) if actual.contains(&expected))
    }

    pub async fn is_brand_page_for(&self, brand: &str) -> bool {
        let expected = Self::brand_title(brand);
        matches!(self.title().await, Ok(actual) if actual.contains(&expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_are_uppercased() {
        assert_eq!(
            CategorySidebar::category_title("Women", "Dress"),
            "WOMEN - DRESS PRODUCTS"
        );
        assert_eq!(CategorySidebar::brand_title("Polo"), "BRAND - POLO PRODUCTS");
    }

    #[test]
    fn test_sub_category_is_scoped_to_panel() {
        let link = CategorySidebar::sub_category_link("Men", "Tshirts");
        assert_eq!(
            link.value(),
            "//div[@id='Men']//a[normalize-space()='Tshirts']"
        );
    }
}
