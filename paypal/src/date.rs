//! Date and timestamp encodings used across PayPal APIs.
//!
//! - [`iso8601`] / [`iso8601_option`]: `2018-03-17T16:06:14Z` timestamps
//! - [`date_only`] / [`date_only_option`]: `2018-03-17` calendar dates
//! - [`InvoiceDate`]: the v1 invoicing `2018-03-17 PDT` form
//!
//! The modules are meant for `#[serde(with = "...")]`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ValidationError, ValidationErrorKind};

/// `strftime` format of date-only values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders a timestamp the way PayPal sends them: UTC, whole seconds, `Z`.
#[must_use]
pub fn format_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses any RFC 3339 timestamp and normalizes it to UTC.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `s` is not RFC 3339.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Serde helpers for required ISO-8601 timestamps.
pub mod iso8601 {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes as `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso8601(value))
    }

    /// Deserializes any RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the input is not an RFC 3339 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_iso8601(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for optional ISO-8601 timestamps.
pub mod iso8601_option {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes `Some` as `YYYY-MM-DDTHH:MM:SSZ` and `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&super::format_iso8601(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Fails if a present value is not an RFC 3339 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_iso8601(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Serde helpers for required `YYYY-MM-DD` dates.
pub mod date_only {
    use super::{DATE_FORMAT, Deserialize, Deserializer, NaiveDate, Serializer};

    /// Serializes as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATE_FORMAT))
    }

    /// Deserializes a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Fails if the input is not a date in that form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for optional `YYYY-MM-DD` dates.
pub mod date_only_option {
    use super::{DATE_FORMAT, Deserialize, Deserializer, NaiveDate, Serializer};

    /// Serializes `Some` as `YYYY-MM-DD` and `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(&value.format(DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Fails if a present value is not a date in that form.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// A calendar date with a time-zone abbreviation, as v1 invoicing sends it.
///
/// ```json
/// "2018-03-17 PDT"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceDate {
    date: NaiveDate,
    zone: String,
}

impl InvoiceDate {
    /// Creates a date, checking that `zone` is a bare abbreviation.
    ///
    /// # Errors
    ///
    /// Returns a `malformedString` [`ValidationError`] if `zone` is empty or
    /// contains anything but ASCII letters.
    pub fn new(date: NaiveDate, zone: impl Into<String>) -> Result<Self, ValidationError> {
        let zone = zone.into();
        if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::new(
                ValidationErrorKind::MalformedString,
                format!("time zone `{zone}` must be an alphabetic abbreviation"),
            ));
        }
        Ok(Self { date, zone })
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time-zone abbreviation.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }
}

impl Display for InvoiceDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(DATE_FORMAT), self.zone)
    }
}

impl FromStr for InvoiceDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            ValidationError::new(
                ValidationErrorKind::MalformedString,
                format!("`{s}` is not a `YYYY-MM-DD ZZZ` date"),
            )
        };
        let (date, zone) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| malformed())?;
        Self::new(date, zone)
    }
}

impl Serialize for InvoiceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InvoiceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "iso8601")]
        at: DateTime<Utc>,
        #[serde(with = "date_only_option", default)]
        due: Option<NaiveDate>,
    }

    #[test]
    fn test_iso8601_encodes_whole_seconds_with_z() {
        let at = Utc.with_ymd_and_hms(2018, 3, 17, 16, 6, 14).unwrap();
        let value = serde_json::to_value(Stamped { at, due: None }).unwrap();
        assert_eq!(value, json!({"at": "2018-03-17T16:06:14Z", "due": null}));
    }

    #[test]
    fn test_iso8601_decodes_offsets_and_fractions() {
        let body = json!({"at": "2018-03-17T09:06:14.250-07:00", "due": "2018-04-01"});
        let decoded: Stamped = serde_json::from_value(body).unwrap();
        assert_eq!(format_iso8601(&decoded.at), "2018-03-17T16:06:14Z");
        assert_eq!(decoded.due, NaiveDate::from_ymd_opt(2018, 4, 1));
    }

    #[test]
    fn test_iso8601_rejects_date_only() {
        assert!(serde_json::from_value::<Stamped>(json!({"at": "2018-03-17"})).is_err());
    }

    #[test]
    fn test_invoice_date() {
        let date: InvoiceDate = serde_json::from_value(json!("2018-03-17 PDT")).unwrap();
        assert_eq!(date.zone(), "PDT");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2018, 3, 17).unwrap());
        assert_eq!(serde_json::to_value(&date).unwrap(), json!("2018-03-17 PDT"));
        assert!("2018-03-17".parse::<InvoiceDate>().is_err());
        assert!("2018-03-17 P+T".parse::<InvoiceDate>().is_err());
        assert!("17/03/2018 PDT".parse::<InvoiceDate>().is_err());
    }
}
