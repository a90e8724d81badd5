//! Monetary amounts and numeric wire encodings.
//!
//! PayPal sends every decimal as a JSON string (`"10.00"`) so that no client
//! parses money through a binary float. Amounts here are [`Decimal`]s that
//! serialize as strings with their scale preserved.
//!
//! Two amount shapes coexist across API families:
//!
//! - [`Money`] `{currency_code, value}` in the v2 APIs (orders, disputes)
//! - [`Currency`] `{currency, value}` in the v1 APIs (invoicing, billing)
//!
//! Models that differ only in which shape they carry are generic over
//! [`MonetaryAmount`].

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::error::{ValidationError, ValidationErrorKind};
use crate::validation::{CurrencyCode, Validated};

/// Three-letter ISO 4217 code.
pub type CurrencyCodeField = Validated<String, CurrencyCode>;

/// Common view over the amount shapes used by different API families.
pub trait MonetaryAmount: Clone + Debug + PartialEq + Serialize + DeserializeOwned {
    /// Builds an amount from a currency code and value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `currency` is not an ISO 4217 code.
    fn from_parts(currency: &str, value: Decimal) -> Result<Self, ValidationError>;

    /// Returns the ISO 4217 currency code.
    fn currency(&self) -> &str;

    /// Returns the decimal value.
    fn value(&self) -> Decimal;
}

/// A v2 amount: `{"currency_code": "USD", "value": "10.00"}`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCodeField,
    /// Amount, string-encoded on the wire.
    #[serde_as(as = "DisplayFromStr")]
    pub value: Decimal,
}

impl MonetaryAmount for Money {
    fn from_parts(currency: &str, value: Decimal) -> Result<Self, ValidationError> {
        Ok(Self {
            currency_code: Validated::new(currency).map_err(|e| e.at("currency_code"))?,
            value,
        })
    }

    fn currency(&self) -> &str {
        &self.currency_code
    }

    fn value(&self) -> Decimal {
        self.value
    }
}

/// A v1 amount: `{"currency": "USD", "value": "10.00"}`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 currency code.
    pub currency: CurrencyCodeField,
    /// Amount, string-encoded on the wire.
    #[serde_as(as = "DisplayFromStr")]
    pub value: Decimal,
}

impl MonetaryAmount for Currency {
    fn from_parts(currency: &str, value: Decimal) -> Result<Self, ValidationError> {
        Ok(Self {
            currency: Validated::new(currency).map_err(|e| e.at("currency"))?,
            value,
        })
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn value(&self) -> Decimal {
        self.value
    }
}

/// Breakdown of a v1 payment [`Amount`].
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    /// Sum of item prices.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub subtotal: Option<Decimal>,
    /// Shipping fee.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub shipping: Option<Decimal>,
    /// Tax.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub tax: Option<Decimal>,
    /// Handling fee.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub handling_fee: Option<Decimal>,
    /// Shipping discount, as a positive number.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub shipping_discount: Option<Decimal>,
    /// Insurance.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub insurance: Option<Decimal>,
    /// Gift wrap fee.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub gift_wrap: Option<Decimal>,
    /// PayPal fee, response only.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub fee: Option<Decimal>,
}

/// A v1 payment amount: `{"currency": "USD", "total": "7.47", "details": {...}}`.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code.
    pub currency: CurrencyCodeField,
    /// Total, including every component of `details`.
    #[serde_as(as = "DisplayFromStr")]
    pub total: Decimal,
    /// Optional breakdown.
    #[serde(default)]
    pub details: Option<Details>,
}

impl Amount {
    /// Creates an amount without a breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `currency` is not an ISO 4217 code.
    pub fn new(currency: &str, total: Decimal) -> Result<Self, ValidationError> {
        Ok(Self {
            currency: Validated::new(currency).map_err(|e| e.at("currency"))?,
            total,
            details: None,
        })
    }

    /// Attaches a breakdown.
    #[must_use]
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }
}

/// A decimal that arrives as either a JSON number or a JSON string and is
/// always sent back as a string.
///
/// Invoicing endpoints echo `quantity` and `percent` in whichever form the
/// merchant first used, so both must decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericString(Decimal);

impl NumericString {
    /// Returns the inner decimal.
    #[must_use]
    pub const fn inner(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for NumericString {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u32> for NumericString {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<NumericString> for Decimal {
    fn from(value: NumericString) -> Self {
        value.0
    }
}

impl FromStr for NumericString {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Display for NumericString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for NumericString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct NumericStringVisitor;

impl Visitor<'_> for NumericStringVisitor {
    type Value = NumericString;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a string holding one")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(NumericString(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericString(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::try_from(v).map(NumericString).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(|_| {
            E::custom(ValidationError::new(
                ValidationErrorKind::MalformedString,
                format!("`{v}` is not a decimal number"),
            ))
        })
    }
}

impl<'de> Deserialize<'de> for NumericString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericStringVisitor)
    }
}

/// A discount or adjustment: either a percentage or a fixed amount.
///
/// On the wire exactly one of `percent` or `amount` is present. A body with
/// both, or neither, is rejected with `badType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cost {
    /// Percentage of the item or invoice total.
    Percent(NumericString),
    /// Fixed amount.
    Amount(Currency),
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Percent(percent) => map.serialize_entry("percent", percent)?,
            Self::Amount(amount) => map.serialize_entry("amount", amount)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let percent = map.remove("percent");
        let amount = map.remove("amount");
        match (percent, amount) {
            (Some(percent), None) => NumericString::deserialize(percent)
                .map(Self::Percent)
                .map_err(de::Error::custom),
            (None, Some(amount)) => Currency::deserialize(amount)
                .map(Self::Amount)
                .map_err(de::Error::custom),
            _ => Err(de::Error::custom(ValidationError::new(
                ValidationErrorKind::BadType,
                "cost must carry exactly one of `percent` or `amount`",
            ))),
        }
    }
}
