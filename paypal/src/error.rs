//! Error types shared by every PayPal API family.
//!
//! - [`ValidationError`] is raised when a [`Validated`](crate::validation::Validated)
//!   field rejects a value, either at construction or while decoding.
//! - [`PayPalError`] is PayPal's own error body, surfaced verbatim when an
//!   endpoint answers with a non-success status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable identifier of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum ValidationErrorKind {
    /// A string or collection is shorter or longer than allowed.
    InvalidLength,
    /// A string does not match the required pattern.
    MalformedString,
    /// A number is outside its inclusive bounds.
    OutOfRange,
    /// A polymorphic field holds none of its accepted shapes.
    BadType,
    /// A billing frequency/interval combination PayPal rejects.
    InvalidFrequency,
}

impl ValidationErrorKind {
    /// Returns the identifier as it appears in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidLength => "invalidLength",
            Self::MalformedString => "malformedString",
            Self::OutOfRange => "outOfRange",
            Self::BadType => "badType",
            Self::InvalidFrequency => "invalidFrequency",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value was rejected by its validation rule.
///
/// Carries the machine-readable [`ValidationErrorKind`], a human-readable
/// reason naming the constraint and the offending measurement, and, once a
/// model attaches it, the field the value was destined for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{kind}: {reason}", FieldPrefix(.field.as_deref()))]
pub struct ValidationError {
    kind: ValidationErrorKind,
    reason: String,
    field: Option<String>,
}

impl ValidationError {
    /// Creates an error without field context.
    #[must_use]
    pub fn new(kind: ValidationErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            field: None,
        }
    }

    /// Attaches the coding key of the field that rejected the value.
    ///
    /// Nested models call this on the way out, so the resulting field reads
    /// as a dotted path (`billing_info.email`).
    #[must_use]
    pub fn at(mut self, field: &str) -> Self {
        self.field = Some(match self.field.take() {
            Some(inner) => format!("{field}.{inner}"),
            None => field.to_owned(),
        });
        self
    }

    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the machine-readable identifier, e.g. `"invalidLength"`.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the field path, if one was attached.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

struct FieldPrefix<'a>(Option<&'a str>);

impl fmt::Display for FieldPrefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(field) => write!(f, "{field}: "),
            None => Ok(()),
        }
    }
}

/// One entry of the `details` array in a PayPal error body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Offending field, as a JSON pointer or dotted path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Offending value, if PayPal echoes it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Where the field lives (`body`, `path`, `query`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Machine-readable issue code.
    #[serde(default)]
    pub issue: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The two body shapes PayPal uses for failures.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Rest {
        name: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        debug_id: Option<String>,
        #[serde(default)]
        information_link: Option<String>,
        #[serde(default)]
        details: Vec<ErrorDetail>,
    },
    OAuth {
        error: String,
        #[serde(default)]
        error_description: String,
    },
}

/// An error answered by a PayPal endpoint.
///
/// `name` and `message` are PayPal's identifier and reason, copied verbatim.
/// Bodies that are not JSON (gateway pages, empty responses) are kept as the
/// message under the name `UNKNOWN_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{name} ({status}): {message}{}", DebugIdSuffix(.debug_id.as_deref()))]
pub struct PayPalError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Machine-readable identifier, e.g. `INVALID_REQUEST` or `invalid_client`.
    pub name: String,
    /// Human-readable reason.
    pub message: String,
    /// Correlation id for PayPal support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_id: Option<String>,
    /// Link to PayPal's documentation for this error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_link: Option<String>,
    /// Per-field issues.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

impl PayPalError {
    /// Identifier used when the body is not a recognizable PayPal error.
    pub const UNKNOWN: &'static str = "UNKNOWN_ERROR";

    /// Builds an error from an HTTP status and raw response body.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody::Rest {
                name,
                message,
                debug_id,
                information_link,
                details,
            }) => Self {
                status,
                name,
                message,
                debug_id,
                information_link,
                details,
            },
            Ok(ErrorBody::OAuth {
                error,
                error_description,
            }) => Self {
                status,
                name: error,
                message: error_description,
                debug_id: None,
                information_link: None,
                details: Vec::new(),
            },
            Err(_) => Self {
                status,
                name: Self::UNKNOWN.to_owned(),
                message: String::from_utf8_lossy(body).into_owned(),
                debug_id: None,
                information_link: None,
                details: Vec::new(),
            },
        }
    }
}

struct DebugIdSuffix<'a>(Option<&'a str>);

impl fmt::Display for DebugIdSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(debug_id) => write!(f, " [debug_id {debug_id}]"),
            None => Ok(()),
        }
    }
}
