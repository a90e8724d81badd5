//! v1 Vault: stored credit cards.
//!
//! Storing a card takes the full number and security code; PayPal answers
//! with a masked number (`xxxxxxxxxxxx1111`) and never returns the code. The
//! request and the stored resource are therefore separate types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::amount::NumericString;
use crate::date::iso8601_option;
use crate::error::ValidationError;
use crate::models::common::{Address, LinkDescription};
use crate::validation::{CardNumber, Cvv2, Range, Text, Validated};

/// Card brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Visa.
    Visa,
    /// Mastercard.
    Mastercard,
    /// Discover.
    Discover,
    /// American Express.
    Amex,
    /// A brand this version does not know.
    #[serde(other)]
    Unknown,
}

/// Whether a stored card can still be charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Usable.
    Ok,
    /// Past its expiry date.
    Expired,
    /// A state this version does not know.
    #[serde(other)]
    Unknown,
}

/// Body of `POST /v1/vault/credit-cards`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardRequest {
    /// Card number, 13 to 19 digits.
    pub number: Validated<String, CardNumber>,
    /// Brand.
    #[serde(rename = "type")]
    pub kind: CardType,
    /// Expiry month, 1 to 12.
    pub expire_month: Validated<u8, Range<1, 12>>,
    /// Expiry year, four digits.
    pub expire_year: Validated<u16, Range<1000, 9999>>,
    /// Security code.
    #[serde(default)]
    pub cvv2: Option<Validated<String, Cvv2>>,
    /// Cardholder first name.
    #[serde(default)]
    pub first_name: Option<Text<0, 64>>,
    /// Cardholder last name.
    #[serde(default)]
    pub last_name: Option<Text<0, 64>>,
    /// Billing address.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Merchant's id for the card owner.
    #[serde(default)]
    pub external_customer_id: Option<Text<0, 256>>,
    /// Merchant id, for partner calls.
    #[serde(default)]
    pub merchant_id: Option<Text<0, 256>>,
    /// Merchant's id for the card.
    #[serde(default)]
    pub external_card_id: Option<Text<0, 256>>,
}

impl CreditCardRequest {
    /// Creates a request from the card's required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the rejected field.
    pub fn new(
        number: &str,
        kind: CardType,
        expire_month: u8,
        expire_year: u16,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            number: Validated::new(number).map_err(|e| e.at("number"))?,
            kind,
            expire_month: Validated::new(expire_month).map_err(|e| e.at("expire_month"))?,
            expire_year: Validated::new(expire_year).map_err(|e| e.at("expire_year"))?,
            cvv2: None,
            first_name: None,
            last_name: None,
            billing_address: None,
            external_customer_id: None,
            merchant_id: None,
            external_card_id: None,
        })
    }

    /// Sets the security code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] unless `cvv2` is 3 or 4 digits.
    pub fn with_cvv2(mut self, cvv2: &str) -> Result<Self, ValidationError> {
        self.cvv2 = Some(Validated::new(cvv2).map_err(|e| e.at("cvv2"))?);
        Ok(self)
    }

    /// Sets the cardholder name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either part exceeds 64 characters.
    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Result<Self, ValidationError> {
        self.first_name = Some(Validated::new(first_name).map_err(|e| e.at("first_name"))?);
        self.last_name = Some(Validated::new(last_name).map_err(|e| e.at("last_name"))?);
        Ok(self)
    }

    /// Sets the merchant's id for the card owner.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `id` is over 256 characters.
    pub fn with_external_customer_id(mut self, id: &str) -> Result<Self, ValidationError> {
        self.external_customer_id =
            Some(Validated::new(id).map_err(|e| e.at("external_customer_id"))?);
        Ok(self)
    }
}

/// A card as stored in the vault.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    /// Vault id, `CARD-...`.
    pub id: String,
    /// Masked number.
    pub number: String,
    /// Brand.
    #[serde(rename = "type")]
    pub kind: CardType,
    /// Expiry month; PayPal echoes a number or a string.
    pub expire_month: NumericString,
    /// Expiry year; PayPal echoes a number or a string.
    pub expire_year: NumericString,
    /// Cardholder first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Cardholder last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Billing address.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Merchant's id for the card owner.
    #[serde(default)]
    pub external_customer_id: Option<String>,
    /// Merchant's id for the card.
    #[serde(default)]
    pub external_card_id: Option<String>,
    /// Whether the card can be charged.
    #[serde(default)]
    pub state: Option<CardState>,
    /// When the vault entry lapses, `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(default, with = "iso8601_option")]
    pub valid_until: Option<DateTime<Utc>>,
    /// Stored at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last updated at.
    #[serde(default, with = "iso8601_option")]
    pub update_time: Option<DateTime<Utc>>,
    /// Related links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// A page of stored cards.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardList {
    /// Cards.
    #[serde(default)]
    pub items: Vec<CreditCard>,
    /// Total cards.
    #[serde(default)]
    pub total_items: Option<u32>,
    /// Total pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Pagination links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let card = CreditCardRequest::new("4417119669820331", CardType::Visa, 11, 2030)
            .unwrap()
            .with_cvv2("874")
            .unwrap()
            .with_name("Betsy", "Buyer")
            .unwrap();
        assert_eq!(
            serde_json::to_value(&card).unwrap(),
            json!({
                "number": "4417119669820331",
                "type": "visa",
                "expire_month": 11,
                "expire_year": 2030,
                "cvv2": "874",
                "first_name": "Betsy",
                "last_name": "Buyer"
            })
        );
    }

    #[test]
    fn test_request_field_rules() {
        let err =
            CreditCardRequest::new("4417-1196-6982-0331", CardType::Visa, 11, 2030).unwrap_err();
        assert_eq!(err.field(), Some("number"));
        assert_eq!(err.kind(), ValidationErrorKind::MalformedString);

        let err = CreditCardRequest::new("4417119669820331", CardType::Visa, 13, 2030).unwrap_err();
        assert_eq!(err.field(), Some("expire_month"));
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);

        assert!(CreditCardRequest::new("4417119669820331", CardType::Visa, 12, 999).is_err());
        assert!(CreditCardRequest::new("4417119669820331", CardType::Visa, 1, 9999).is_ok());

        let card = CreditCardRequest::new("4417119669820331", CardType::Visa, 1, 2030).unwrap();
        assert!(card.clone().with_cvv2("87").is_err());
        assert!(card.with_external_customer_id(&"c".repeat(257)).is_err());
    }

    #[test]
    fn test_request_decode_checks_range() {
        let body = json!({
            "number": "4417119669820331",
            "type": "visa",
            "expire_month": 0,
            "expire_year": 2030
        });
        let err = serde_json::from_value::<CreditCardRequest>(body).unwrap_err();
        assert!(err.to_string().contains("outOfRange"));
    }

    #[test]
    fn test_stored_card_decodes_masked_number() {
        let card: CreditCard = serde_json::from_value(json!({
            "id": "CARD-1MD19612EW4364010KGFNJQI",
            "state": "ok",
            "number": "xxxxxxxxxxxx0331",
            "type": "visa",
            "expire_month": "11",
            "expire_year": "2030",
            "external_customer_id": "customer-123",
            "valid_until": "2033-02-16T00:00:00Z",
            "create_time": "2016-02-17T17:59:33Z"
        }))
        .unwrap();
        assert_eq!(card.state, Some(CardState::Ok));
        assert_eq!(card.expire_month, NumericString::from(11));
        assert_eq!(card.number, "xxxxxxxxxxxx0331");
    }
}
