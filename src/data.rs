//! Test data: the registration profile and unique value generators

use chrono::Local;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Date of birth as the signup dropdowns expect it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub day: String,
    pub month: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub address2: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub mobile_number: String,
}

/// Everything the account-information form asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// "Mr" or "Mrs"
    pub title: String,
    pub password: String,
    pub date_of_birth: DateOfBirth,
    pub personal_info: PersonalInfo,
    pub address: Address,
    pub contact: Contact,
    pub newsletter: bool,
    pub special_offers: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            title: "Mr".to_string(),
            password: "Test@12345".to_string(),
            date_of_birth: DateOfBirth {
                day: "10".to_string(),
                month: "5".to_string(),
                year: "1995".to_string(),
            },
            personal_info: PersonalInfo {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                company: "QA Labs".to_string(),
            },
            address: Address {
                address1: "221B Baker Street".to_string(),
                address2: "Floor 2".to_string(),
                country: "Canada".to_string(),
                state: "Ontario".to_string(),
                city: "Toronto".to_string(),
                zipcode: "M5V 2T6".to_string(),
            },
            contact: Contact {
                mobile_number: "4165550123".to_string(),
            },
            newsletter: true,
            special_offers: true,
        }
    }
}

/// Card details for the payment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    pub name_on_card: String,
    pub card_number: String,
    pub cvc: String,
    pub expiry_month: String,
    pub expiry_year: String,
}

impl PaymentCard {
    /// Card built from the profile's name
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self {
            name_on_card: format!(
                "{} {}",
                profile.personal_info.first_name, profile.personal_info.last_name
            ),
            card_number: "4111111111111111".to_string(),
            cvc: "123".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "2030".to_string(),
        }
    }
}

/// Lowercase ASCII string of `length` characters
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .filter(|c| c.is_ascii_alphabetic())
        .take(length)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// `<prefix>_<timestamp>`
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, timestamp())
}

/// `<prefix>_<timestamp>_<random>@example.com`
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}_{}@example.com", prefix, timestamp(), random_string(4))
}
