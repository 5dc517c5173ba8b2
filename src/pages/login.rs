//! Signup and login forms

use super::{HomePage, Page, PageContext, PageId, SignUpPage};
use crate::error::Result;
use crate::interaction::Interactor;
use crate::Locator;
use tracing::{info, instrument, warn};

/// Where a signup submission ended up
#[derive(Debug)]
pub enum SignupOutcome {
    /// The account information form opened
    AccountForm(SignUpPage),
    /// The address is already registered; still on the login page
    EmailTaken(LoginPage),
}

#[derive(Debug, Clone)]
pub struct LoginPage {
    ctx: PageContext,
}

impl LoginPage {
    pub const SIGNUP_LABEL: Locator = Locator::css("div[class='signup-form'] h2");
    pub const SIGNUP_NAME: Locator = Locator::css("input[placeholder='Name']");
    pub const SIGNUP_EMAIL: Locator = Locator::css("input[data-qa='signup-email']");
    pub const SIGNUP_BUTTON: Locator = Locator::css("button[data-qa='signup-button']");
    pub const EMAIL_EXISTS: Locator =
        Locator::xpath("//p[normalize-space()='Email Address already exist!']");

    pub const LOGIN_LABEL: Locator = Locator::css("div[class='login-form'] h2");
    pub const LOGIN_EMAIL: Locator = Locator::css("input[data-qa='login-email']");
    pub const LOGIN_PASSWORD: Locator = Locator::css("input[data-qa='login-password']");
    pub const LOGIN_BUTTON: Locator = Locator::css("button[data-qa='login-button']");
    pub const LOGIN_ERROR: Locator =
        Locator::xpath("//p[normalize-space()='Your email or password is incorrect!']");

    fn ui(&self) -> &Interactor {
        self.ctx.ui()
    }

    pub async fn new_user_signup_message(&self) -> Result<String> {
        self.ui().read_text(&Self::SIGNUP_LABEL).await
    }

    pub async fn login_to_your_account_message(&self) -> Result<String> {
        self.ui().read_text(&Self::LOGIN_LABEL).await
    }

    pub async fn enter_name(&self, name: &str) -> Result<()> {
        info!("Entering signup name {}", name);
        self.ui().type_text(&Self::SIGNUP_NAME, name).await
    }

    pub async fn enter_email(&self, email: &str) -> Result<()> {
        info!("Entering signup email {}", email);
        self.ui().type_text(&Self::SIGNUP_EMAIL, email).await
    }

    /// Submit the signup form expecting the account form to open
    #[instrument(skip(self))]
    pub async fn sign_up(&self, name: &str, email: &str) -> Result<SignUpPage> {
        self.enter_name(name).await?;
        self.enter_email(email).await?;
        self.ui().click(&Self::SIGNUP_BUTTON).await?;
        Ok(self.ctx.navigator().signup_page())
    }

    /// Submit the signup form and report which screen answered
    #[instrument(skip(self))]
    pub async fn try_sign_up(&self, name: &str, email: &str) -> Result<SignupOutcome> {
        let signup = self.sign_up(name, email).await?;
        let landed = self
            .ui()
            .wait_for_any(&[SignUpPage::ACCOUNT_INFO_LABEL, Self::EMAIL_EXISTS])
            .await?;
        if landed == 0 {
            return Ok(SignupOutcome::AccountForm(signup));
        }
        warn!("Signup rejected: {} is already registered", email);
        Ok(SignupOutcome::EmailTaken(self.ctx.navigator().login_page()))
    }

    pub async fn email_already_exists_message(&self) -> Result<String> {
        self.ui().read_text(&Self::EMAIL_EXISTS).await
    }

    pub async fn enter_login_email(&self, email: &str) -> Result<()> {
        self.ui().type_text(&Self::LOGIN_EMAIL, email).await
    }

    pub async fn enter_password(&self, password: &str) -> Result<()> {
        self.ui().type_text(&Self::LOGIN_PASSWORD, password).await
    }

    pub async fn click_login(&self) -> Result<HomePage> {
        info!("Clicking login button");
        self.ui().click(&Self::LOGIN_BUTTON).await?;
        Ok(self.ctx.navigator().home_page())
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<HomePage> {
        self.enter_login_email(email).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }

    pub async fn incorrect_credentials_message(&self) -> Result<String> {
        self.ui().read_text(&Self::LOGIN_ERROR).await
    }
}

impl Page for LoginPage {
    const ID: PageId = PageId::Login;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::SIGNUP_LABEL
    }
}
