//! Contact form with attachment upload

use super::{HomePage, Page, PageContext, PageId};
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Contents of the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Local file to attach
    pub attachment: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ContactUsPage {
    ctx: PageContext,
}

impl ContactUsPage {
    pub const GET_IN_TOUCH: Locator = Locator::xpath("//h2[normalize-space()='Get In Touch']");
    pub const NAME: Locator = Locator::css("input[placeholder='Name']");
    pub const EMAIL: Locator = Locator::css("input[placeholder='Email']");
    pub const SUBJECT: Locator = Locator::css("input[placeholder='Subject']");
    pub const MESSAGE: Locator = Locator::id("message");
    pub const UPLOAD: Locator = Locator::css("input[name='upload_file']");
    pub const SUBMIT: Locator = Locator::css("input[value='Submit']");
    pub const SUCCESS: Locator = Locator::xpath("//div[@class='status alert alert-success']");
    pub const HOME: Locator = Locator::css(".btn.btn-success");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn get_in_touch_message(&self) -> Result<String> {
        self.ui().read_text(&Self::GET_IN_TOUCH).await
    }

    #[instrument(skip_all)]
    pub async fn fill_form(&self, form: &ContactForm) -> Result<()> {
        info!("Filling contact form");
        self.ui().type_text(&Self::NAME, &form.name).await?;
        self.ui().type_text(&Self::EMAIL, &form.email).await?;
        self.ui().type_text(&Self::SUBJECT, &form.subject).await?;
        self.ui().type_text(&Self::MESSAGE, &form.message).await?;
        if let Some(path) = &form.attachment {
            self.ui().upload_file(&Self::UPLOAD, path).await?;
        }
        Ok(())
    }

    pub async fn click_submit(&self) -> Result<()> {
        self.ui().click(&Self::SUBMIT).await
    }

    /// Submit and accept the confirmation alert; returns the alert text
    pub async fn submit_and_confirm(&self) -> Result<String> {
        self.click_submit().await?;
        self.ui().accept_alert().await
    }

    pub async fn success_message(&self) -> Result<String> {
        self.ui().read_text(&Self::SUCCESS).await
    }

    pub async fn click_home(&self) -> Result<HomePage> {
        self.ui().click(&Self::HOME).await?;
        Ok(self.ctx.navigator().home_page())
    }
}

impl Page for ContactUsPage {
    const ID: PageId = PageId::ContactUs;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::GET_IN_TOUCH
    }
}
