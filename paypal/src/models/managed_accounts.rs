//! v3 Managed accounts: merchant onboarding by a platform partner.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::error::ValidationError;
use crate::models::common::{AddressPortable, CountryCodeField, Email, LinkDescription, Name};
use crate::validation::{Text, Validated};

/// Legal form of the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessType {
    /// A single person.
    Individual,
    /// Sole proprietorship.
    Proprietorship,
    /// Partnership.
    Partnership,
    /// Corporation.
    Corporation,
    /// Non-profit.
    Nonprofit,
    /// Government entity.
    Government,
    /// A type this version does not know.
    #[serde(other)]
    Unknown,
}

/// The business behind a managed account.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    /// Legal business name.
    pub business_name: Text<1, 300>,
    /// Legal form.
    pub business_type: BusinessType,
    /// PayPal merchant category code.
    #[serde(default)]
    pub category: Option<Text<1, 20>>,
    /// Website.
    #[serde(default)]
    pub website: Option<Text<1, 2048>>,
    /// Registered address.
    #[serde(default)]
    pub address: Option<AddressPortable>,
}

impl BusinessDetails {
    /// Creates business details.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `business_name` is empty or over 300 characters.
    pub fn new(business_name: &str, business_type: BusinessType) -> Result<Self, ValidationError> {
        Ok(Self {
            business_name: Validated::new(business_name).map_err(|e| e.at("business_name"))?,
            business_type,
            category: None,
            website: None,
            address: None,
        })
    }
}

/// Body of `POST /v3/customer/managed-accounts`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedAccount {
    /// Partner's own id for the merchant.
    #[serde(default)]
    pub external_id: Option<Text<1, 127>>,
    /// Merchant e-mail.
    pub email_address: Email,
    /// Country the account is opened in.
    pub country_code: CountryCodeField,
    /// Language of PayPal's communication, e.g. `en_US`.
    #[serde(default)]
    pub preferred_language_code: Option<Text<2, 11>>,
    /// The business.
    pub business_details: BusinessDetails,
    /// Primary contact.
    #[serde(default)]
    pub owner: Option<Name>,
}

impl ManagedAccount {
    /// Creates an onboarding request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `email_address` or `country_code` is rejected.
    pub fn new(
        email_address: &str,
        country_code: &str,
        business_details: BusinessDetails,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            external_id: None,
            email_address: Validated::new(email_address).map_err(|e| e.at("email_address"))?,
            country_code: Validated::new(country_code).map_err(|e| e.at("country_code"))?,
            preferred_language_code: None,
            business_details,
            owner: None,
        })
    }

    /// Sets the partner's id for the merchant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `external_id` is empty or over 127 characters.
    pub fn with_external_id(mut self, external_id: &str) -> Result<Self, ValidationError> {
        self.external_id = Some(Validated::new(external_id).map_err(|e| e.at("external_id"))?);
        Ok(self)
    }
}

/// Response of the create and get endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedAccountResponse {
    /// PayPal account id.
    pub account_id: String,
    /// Partner's id, echoed.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Onboarding status.
    #[serde(default)]
    pub status: Option<String>,
    /// Related links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_managed_account_wire_shape() {
        let account = ManagedAccount::new(
            "merchant@example.com",
            "US",
            BusinessDetails::new("Acme Widgets", BusinessType::Corporation).unwrap(),
        )
        .unwrap()
        .with_external_id("partner-42")
        .unwrap();
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({
                "external_id": "partner-42",
                "email_address": "merchant@example.com",
                "country_code": "US",
                "business_details": {
                    "business_name": "Acme Widgets",
                    "business_type": "CORPORATION"
                }
            })
        );
    }

    #[test]
    fn test_managed_account_rejects_bad_email() {
        let business = BusinessDetails::new("Acme", BusinessType::Individual).unwrap();
        let err = ManagedAccount::new("acme.example.com", "US", business).unwrap_err();
        assert_eq!(err.field(), Some("email_address"));
    }

    #[test]
    fn test_language_code_bounds() {
        assert!(Text::<2, 11>::new("en").is_ok());
        assert!(Text::<2, 11>::new("e").is_err());
        assert!(Text::<2, 11>::new("zh-Hant_TW1").is_ok());
        assert!(Text::<2, 11>::new("zh-Hant_TW12").is_err());
    }

    #[test]
    fn test_response_decodes() {
        let response: ManagedAccountResponse = serde_json::from_value(json!({
            "account_id": "YQZCHTGHUK5P8",
            "links": [{
                "href": "https://api-m.paypal.com/v3/customer/managed-accounts/YQZCHTGHUK5P8",
                "rel": "self",
                "method": "GET"
            }]
        }))
        .unwrap();
        assert_eq!(response.account_id, "YQZCHTGHUK5P8");
        assert!(response.status.is_none());
    }
}
