//! Multi-page flows that many scenarios start from

use crate::data::{unique_email, unique_username, UserProfile};
use crate::error::Result;
use crate::navigator::Navigator;
use crate::pages::{HomePage, Page};
use tracing::{info, instrument};

/// Credentials of an account created by [`register_user`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register a fresh account, then log out again.
///
/// Starts from the home page as a guest and ends on the login page, so the
/// caller can log in with the returned credentials.
#[instrument(skip_all)]
pub async fn register_user(navigator: &Navigator, profile: &UserProfile) -> Result<RegisteredUser> {
    let user = RegisteredUser {
        name: unique_username("user"),
        email: unique_email("user"),
        password: profile.password.clone(),
    };
    info!("Registering {}", user.email);

    let home = navigator.open_site().await?;
    let signup = home
        .header()
        .click_signup_login()
        .await?
        .sign_up(&user.name, &user.email)
        .await?;
    let home: HomePage = signup.create_account(profile).await?.click_continue().await?;
    home.logout().await?;

    info!("Registered and logged out {}", user.name);
    Ok(user)
}
