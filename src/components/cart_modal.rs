//! Confirmation dialog shown after adding a product to the cart

use crate::error::Result;
use crate::interaction::Interactor;
use crate::pages::{CartPage, PageContext};
use crate::Locator;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CartModal {
    ctx: PageContext,
}

impl CartModal {
    pub const CONTAINER: Locator = Locator::css(".modal-content");
    pub const CONTINUE_SHOPPING: Locator =
        Locator::xpath("//button[normalize-space()='Continue Shopping']");
    pub const VIEW_CART: Locator = Locator::xpath("//u[normalize-space()='View Cart']");

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn is_visible(&self) -> bool {
        info!("Checking Add to Cart modal visibility");
        self.ui().is_visible(&Self::CONTAINER).await
    }

    /// Dismiss the dialog and wait for it to close
    pub async fn continue_shopping(&self) -> Result<()> {
        info!("Continue shopping");
        self.ui().click(&Self::CONTINUE_SHOPPING).await?;
        if !self.ui().wait_until_gone(&Self::CONTAINER).await? {
            warn!("Cart modal still visible after Continue Shopping");
        }
        Ok(())
    }

    pub async fn view_cart(&self) -> Result<CartPage> {
        info!("Viewing cart from modal");
        self.ui().click(&Self::VIEW_CART).await?;
        Ok(self.ctx.navigator().cart_page())
    }
}
