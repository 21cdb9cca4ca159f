//! Subscriber account model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Account status as stored by the billing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    /// Anything other than `active` counts as inactive.
    pub fn from_string(s: &str) -> Self {
        match s {
            "active" => AccountStatus::Active,
            _ => AccountStatus::Inactive,
        }
    }
}

/// PPPoE subscriber account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientAccount {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub mobile_number: String,
    pub email: String,
    pub description: Option<String>,
    pub balance: Decimal,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub union_name: Option<String>,
    pub zip: Option<String>,
    pub status: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_type: Option<String>,
    pub auto_renew: bool,
    pub user_profile: Option<String>,
    pub next_user_profile: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl ClientAccount {
    pub fn account_status(&self) -> AccountStatus {
        AccountStatus::from_string(&self.status)
    }

    /// Current package profile name, if one is assigned.
    pub fn current_profile(&self) -> Option<&str> {
        self.user_profile
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Self-service contact details update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContactDetails {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 255))]
    pub mobile_number: Option<String>,

    #[validate(length(max = 255))]
    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub address_line1: Option<String>,

    #[validate(length(max = 255))]
    pub address_line2: Option<String>,

    #[validate(length(max = 255))]
    pub city: Option<String>,

    #[validate(length(max = 255))]
    pub district: Option<String>,

    #[validate(length(max = 255))]
    pub upazila: Option<String>,

    #[validate(length(max = 255))]
    pub union_name: Option<String>,

    #[validate(length(max = 255))]
    pub zip: Option<String>,
}

impl UpdateContactDetails {
    /// Trim free-text input and drop blank optional fields.
    pub fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.mobile_number = clean(self.mobile_number);
        self.description = clean(self.description);
        self.address_line1 = clean(self.address_line1);
        self.address_line2 = clean(self.address_line2);
        self.city = clean(self.city);
        self.district = clean(self.district);
        self.upazila = clean(self.upazila);
        self.union_name = clean(self.union_name);
        self.zip = clean(self.zip);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_inactive() {
        assert_eq!(AccountStatus::from_string("active"), AccountStatus::Active);
        assert_eq!(AccountStatus::from_string("inactive"), AccountStatus::Inactive);
        assert_eq!(AccountStatus::from_string("ACTIVE"), AccountStatus::Inactive);
        assert_eq!(AccountStatus::from_string(""), AccountStatus::Inactive);
    }

    #[test]
    fn test_normalized_contact_details() {
        let input = UpdateContactDetails {
            name: "  Rahim Uddin ".to_string(),
            email: " Rahim@Example.COM ".to_string(),
            city: Some("   ".to_string()),
            zip: Some(" 1207 ".to_string()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(input.name, "Rahim Uddin");
        assert_eq!(input.email, "rahim@example.com");
        assert_eq!(input.city, None);
        assert_eq!(input.zip.as_deref(), Some("1207"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_contact_details_require_name_and_valid_email() {
        let input = UpdateContactDetails {
            name: String::new(),
            email: "nope".to_string(),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }
}
