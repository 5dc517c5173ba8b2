//! Storefront landing page

use super::{AccountDeletedPage, LoginPage, Page, PageContext, PageId, ProductDetailsPage};
use crate::components::CartModal;
use crate::error::Result;
use crate::Locator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct HomePage {
    ctx: PageContext,
}

impl HomePage {
    pub const SLIDER: Locator = Locator::css("#slider-carousel");
    pub const FEATURES: Locator = Locator::css(".features_items");

    pub async fn is_home_page_visible(&self) -> bool {
        info!("Verifying home page is visible");
        self.header().is_visible().await
    }

    pub async fn is_slider_visible(&self) -> bool {
        self.ctx.ui().is_visible(&Self::SLIDER).await
    }

    pub async fn is_logged_user_visible(&self) -> bool {
        self.header().is_logged_user_visible().await
    }

    pub async fn view_product(&self, name: &str) -> Result<ProductDetailsPage> {
        self.product_grid().view_product(name).await
    }

    pub async fn add_product_to_cart(&self, name: &str) -> Result<CartModal> {
        self.product_grid().add_to_cart(name).await
    }

    pub async fn logout(&self) -> Result<LoginPage> {
        info!("Logging out via header");
        self.header().click_logout().await
    }

    pub async fn delete_account(&self) -> Result<AccountDeletedPage> {
        info!("Deleting account via header");
        self.header().click_delete_account().await
    }
}

impl Page for HomePage {
    const ID: PageId = PageId::Home;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::SLIDER
    }
}
