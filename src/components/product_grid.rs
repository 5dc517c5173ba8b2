//! Product cards and the recommended-items carousel
//!
//! Card markup embeds the product name, so most locators here are generated
//! from it.

use crate::components::CartModal;
use crate::error::Result;
use crate::interaction::Interactor;
use crate::locator::xpath_literal;
use crate::pages::{PageContext, ProductDetailsPage};
use crate::{By, Locator};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ProductGrid {
    ctx: PageContext,
}

impl ProductGrid {
    pub const RECOMMENDED_LABEL: Locator =
        Locator::xpath("//h2[normalize-space()='recommended items']");
    pub const RECOMMENDED_SECTION: Locator = Locator::css(".recommended_items");
    pub const CARDS: Locator = Locator::class_name("product-image-wrapper");

    /// Whole card; hovering it reveals the overlay
    pub fn card(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@class='single-products'][.//p[normalize-space()={}]]",
                xpath_literal(name)
            ),
        )
    }

    pub fn view_product_link(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@class='product-image-wrapper'][.//p[normalize-space()={}]]//a[contains(text(),'View Product')]",
                xpath_literal(name)
            ),
        )
    }

    /// "Add to cart" inside the hover overlay
    pub fn overlay_add_button(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@class='overlay-content'][.//p[normalize-space()={}]]//a[contains(@class,'add-to-cart')]",
                xpath_literal(name)
            ),
        )
    }

    /// "Add to cart" of a carousel item
    pub fn recommended_add_button(name: &str) -> Locator {
        Locator::dynamic(
            By::XPath,
            format!(
                "//div[@id='recommended-item-carousel']//p[text()={}]/following-sibling::a",
                xpath_literal(name)
            ),
        )
    }

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_recommended_visible(&self) -> bool {
        info!("Verifying recommended items visibility");
        self.ui().is_visible(&Self::RECOMMENDED_LABEL).await
    }

    pub async fn scroll_to_recommended(&self) -> Result<()> {
        self.ui().scroll_into_view(&Self::RECOMMENDED_SECTION).await
    }

    #[instrument(skip(self))]
    pub async fn view_product(&self, name: &str) -> Result<ProductDetailsPage> {
        info!("Opening details of {}", name);
        let link = Self::view_product_link(name);
        self.ui().scroll_into_view(&link).await?;
        self.ui().click(&link).await?;
        Ok(self.ctx.navigator().product_details_page())
    }

    /// Scroll to the card, hover it and click the overlay's add button
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, name: &str) -> Result<CartModal> {
        info!("Adding {} to cart", name);
        let card = Self::card(name);
        self.ui().scroll_into_view(&card).await?;
        self.ui().hover(&card).await?;
        self.ui().click(&Self::overlay_add_button(name)).await?;
        Ok(CartModal::new(self.ctx.clone()))
    }

    #[instrument(skip(self))]
    pub async fn add_recommended_to_cart(&self, name: &str) -> Result<CartModal> {
        info!("Adding recommended {} to cart", name);
        self.scroll_to_recommended().await?;
        self.ui().click(&Self::recommended_add_button(name)).await?;
        Ok(CartModal::new(self.ctx.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_locators_embed_name() {
        let card = ProductGrid::card("Blue Top");
        assert_eq!(card.by(), By::XPath);
        assert_eq!(
            card.value(),
            "//div[@class='single-products'][.//p[normalize-space()='Blue Top']]"
        );
    }

    #[test]
    fn test_generated_locators_quote_apostrophes() {
        let link = ProductGrid::view_product_link("Men's Tshirt");
        assert!(link.value().contains("normalize-space()=\"Men's Tshirt\""));
    }
}
