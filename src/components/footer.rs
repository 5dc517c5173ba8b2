//! Footer newsletter subscription

use crate::error::Result;
use crate::interaction::Interactor;
use crate::pages::PageContext;
use crate::Locator;
use tracing::{info, instrument};

/// Message shown once a subscription went through
pub const SUBSCRIBED_MESSAGE: &str = "You have been successfully subscribed!";

#[derive(Debug, Clone)]
pub struct Footer {
    ctx: PageContext,
}

impl Footer {
    pub const SUBSCRIPTION_LABEL: Locator = Locator::xpath("//h2[normalize-space()='Subscription']");
    pub const EMAIL_INPUT: Locator = Locator::id("susbscribe_email");
    pub const SUBSCRIBE_BUTTON: Locator = Locator::id("subscribe");
    pub const SUCCESS_MESSAGE: Locator = Locator::css("#success-subscribe .alert-success");

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    /// Bring the footer into view; several of its controls only react once
    /// scrolled to
    pub async fn scroll_to_footer(&self) -> Result<()> {
        info!("Scrolling down to footer");
        self.ui().scroll_to_bottom().await?;
        self.ui().scroll_into_view(&Self::SUBSCRIPTION_LABEL).await
    }

    pub async fn is_subscription_label_visible(&self) -> bool {
        if let Err(e) = self.ui().scroll_into_view(&Self::SUBSCRIPTION_LABEL).await {
            info!("Subscription label not reachable: {}", e);
            return false;
        }
        self.ui().is_visible(&Self::SUBSCRIPTION_LABEL).await
    }

    pub async fn subscription_label_text(&self) -> Result<String> {
        self.ui().read_text(&Self::SUBSCRIPTION_LABEL).await
    }

    #[instrument(skip(self))]
    pub async fn subscribe(&self, email: &str) -> Result<()> {
        info!("Subscribing to newsletter with {}", email);
        self.ui().type_text(&Self::EMAIL_INPUT, email).await?;
        self.ui().click(&Self::SUBSCRIBE_BUTTON).await
    }

    pub async fn is_success_message_visible(&self) -> bool {
        self.ui().is_visible(&Self::SUCCESS_MESSAGE).await
    }

    pub async fn success_message(&self) -> Result<String> {
        self.ui().read_text(&Self::SUCCESS_MESSAGE).await
    }

    /// Whether the confirmation with the expected wording appeared
    pub async fn is_subscribed(&self) -> bool {
        match self.success_message().await {
            Ok(text) => text.contains(SUBSCRIBED_MESSAGE),
            Err(_) => false,
        }
    }
}
