//! Types shared by several API families.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::error::ValidationError;
use crate::validation::{
    CountryCode, EmailAddress, Length, NationalNumber, PhoneCountryCode, Text, Validated,
};

/// E-mail address, 3 to 254 characters.
pub type Email = Validated<String, (Length<3, 254>, EmailAddress)>;

/// ISO 3166-1 alpha-2 country code.
pub type CountryCodeField = Validated<String, CountryCode>;

/// A v1 postal address.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// First street line.
    pub line1: Text<0, 300>,
    /// Second street line.
    #[serde(default)]
    pub line2: Option<Text<0, 300>>,
    /// City.
    pub city: Text<0, 120>,
    /// State, province or region.
    #[serde(default)]
    pub state: Option<Text<0, 300>>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<Text<0, 60>>,
    /// Two-letter country code.
    pub country_code: CountryCodeField,
    /// Phone number at this address.
    #[serde(default)]
    pub phone: Option<Phone>,
}

impl Address {
    /// Creates an address from its required parts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first field that is rejected.
    pub fn new(line1: &str, city: &str, country_code: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            line1: Validated::new(line1).map_err(|e| e.at("line1"))?,
            line2: None,
            city: Validated::new(city).map_err(|e| e.at("city"))?,
            state: None,
            postal_code: None,
            country_code: Validated::new(country_code).map_err(|e| e.at("country_code"))?,
            phone: None,
        })
    }

    /// Sets the state.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `state` is over 300 characters.
    pub fn with_state(mut self, state: &str) -> Result<Self, ValidationError> {
        self.state = Some(Validated::new(state).map_err(|e| e.at("state"))?);
        Ok(self)
    }

    /// Sets the postal code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `postal_code` is over 60 characters.
    pub fn with_postal_code(mut self, postal_code: &str) -> Result<Self, ValidationError> {
        self.postal_code = Some(Validated::new(postal_code).map_err(|e| e.at("postal_code"))?);
        Ok(self)
    }
}

/// A v2 portable address, as used by orders and managed accounts.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPortable {
    /// Street line.
    #[serde(default)]
    pub address_line_1: Option<Text<0, 300>>,
    /// Suite, apartment, floor.
    #[serde(default)]
    pub address_line_2: Option<Text<0, 300>>,
    /// City or town.
    #[serde(default)]
    pub admin_area_2: Option<Text<0, 120>>,
    /// State or province.
    #[serde(default)]
    pub admin_area_1: Option<Text<0, 300>>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<Text<0, 60>>,
    /// Two-letter country code.
    pub country_code: CountryCodeField,
}

/// A person's name, v2 shape.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Given (first) name.
    #[serde(default)]
    pub given_name: Option<Text<0, 140>>,
    /// Surname (family name).
    #[serde(default)]
    pub surname: Option<Text<0, 140>>,
    /// Full name, when PayPal only has it unsplit.
    #[serde(default)]
    pub full_name: Option<Text<0, 300>>,
}

impl Name {
    /// Creates a name from given name and surname.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either part exceeds 140 characters.
    pub fn new(given_name: &str, surname: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            given_name: Some(Validated::new(given_name).map_err(|e| e.at("given_name"))?),
            surname: Some(Validated::new(surname).map_err(|e| e.at("surname"))?),
            full_name: None,
        })
    }
}

/// A telephone number split into calling code and national number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Country calling code, 1 to 3 digits.
    pub country_code: Validated<String, PhoneCountryCode>,
    /// National number, up to 14 digits.
    pub national_number: Validated<String, NationalNumber>,
}

impl Phone {
    /// Creates a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either part is not all digits or too long.
    pub fn new(country_code: &str, national_number: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            country_code: Validated::new(country_code).map_err(|e| e.at("country_code"))?,
            national_number: Validated::new(national_number).map_err(|e| e.at("national_number"))?,
        })
    }
}

/// A HATEOAS link returned with most resources.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescription {
    /// Target URL.
    pub href: String,
    /// Relation, e.g. `self`, `approve`, `next`.
    pub rel: String,
    /// HTTP method to use on `href`.
    #[serde(default)]
    pub method: Option<String>,
}

/// Finds the link with relation `rel`.
#[must_use]
pub fn find_link<'a>(links: &'a [LinkDescription], rel: &str) -> Option<&'a LinkDescription> {
    links.iter().find(|link| link.rel == rel)
}

/// Audit fields PayPal attaches to v1 invoices and templates.
///
/// Dates are kept as sent (`"2018-03-17 09:10:11 PDT"`); PayPal does not
/// use one format consistently across these fields.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// When the resource was created.
    #[serde(default)]
    pub created_date: Option<String>,
    /// Who created it.
    #[serde(default)]
    pub created_by: Option<String>,
    /// When it was cancelled.
    #[serde(default)]
    pub cancelled_date: Option<String>,
    /// Who cancelled it.
    #[serde(default)]
    pub cancelled_by: Option<String>,
    /// Last update time.
    #[serde(default)]
    pub last_updated_date: Option<String>,
    /// Who last updated it.
    #[serde(default)]
    pub last_updated_by: Option<String>,
    /// First time the payer opened it.
    #[serde(default)]
    pub first_sent_date: Option<String>,
    /// Last time it was sent.
    #[serde(default)]
    pub last_sent_date: Option<String>,
    /// Who last sent it.
    #[serde(default)]
    pub last_sent_by: Option<String>,
    /// Link the payer follows to view it.
    #[serde(default)]
    pub payer_view_url: Option<String>,
}

/// JSON Patch operation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    /// Adds a value.
    Add,
    /// Removes a value.
    Remove,
    /// Replaces a value.
    Replace,
    /// Moves a value from `from`.
    Move,
    /// Copies a value from `from`.
    Copy,
    /// Tests a value.
    Test,
}

/// One JSON Patch operation, as PATCH endpoints take them.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Operation.
    pub op: PatchOperation,
    /// JSON pointer to the target.
    pub path: String,
    /// New value, for `add`, `replace` and `test`.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Source pointer, for `move` and `copy`.
    #[serde(default)]
    pub from: Option<String>,
}

impl Patch {
    /// A `replace` of `path` with `value`.
    #[must_use]
    pub fn replace(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            op: PatchOperation::Replace,
            path: path.into(),
            value: Some(value),
            from: None,
        }
    }

    /// An `add` of `value` at `path`.
    #[must_use]
    pub fn add(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            op: PatchOperation::Add,
            path: path.into(),
            value: Some(value),
            from: None,
        }
    }

    /// A `remove` of `path`.
    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOperation::Remove,
            path: path.into(),
            value: None,
            from: None,
        }
    }
}
