//! Errors raised while talking to PayPal.

use paypal::PayPalError;

/// A failed PayPal call.
///
/// Every variant names the call it came from, e.g. `"POST /v1/oauth2/token"`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// An authenticated call was attempted before any token was obtained.
    #[error("attempted authenticated request before authenticating: {context}")]
    NotAuthenticated {
        /// Call that was refused.
        context: &'static str,
    },
    /// The endpoint URL could not be built.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Call being built.
        context: &'static str,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// Transport failure: connect, timeout, TLS or body read.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Call in flight.
        context: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The request body could not be serialized.
    #[error("failed to encode request body: {context}: {source}")]
    Encode {
        /// Call being built.
        context: &'static str,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// A 2xx body did not decode into the expected model, or failed one of
    /// its field rules.
    #[error("failed to decode response: {context}: at `{path}`: {source}")]
    Decode {
        /// Call whose response was rejected.
        context: &'static str,
        /// Coding key path of the offending value, e.g. `items[0].name`;
        /// `.` for the document root.
        path: String,
        /// Line of the offending value, 1-based.
        line: usize,
        /// Column of the offending value, 1-based.
        column: usize,
        /// Underlying decode error; its message carries the rule identifier.
        #[source]
        source: serde_json::Error,
    },
    /// PayPal answered with a non-2xx status.
    #[error("PayPal API error: {context}: {source}")]
    Api {
        /// Call that was answered.
        context: &'static str,
        /// Error body with the HTTP status filled in.
        #[source]
        source: PayPalError,
    },
    /// A header value contained bytes HTTP does not allow.
    #[error("invalid header value: {context}: {source}")]
    InvalidHeader {
        /// Call being built.
        context: &'static str,
        /// Underlying header error.
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

impl RequestError {
    pub(crate) fn decode(
        context: &'static str,
        error: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        let path = error.path().to_string();
        Self::decode_at(context, path, error.into_inner())
    }

    pub(crate) fn decode_at(
        context: &'static str,
        path: String,
        source: serde_json::Error,
    ) -> Self {
        Self::Decode {
            context,
            path,
            line: source.line(),
            column: source.column(),
            source,
        }
    }

    /// Name of the call that failed.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        match self {
            Self::NotAuthenticated { context }
            | Self::UrlParse { context, .. }
            | Self::Http { context, .. }
            | Self::Encode { context, .. }
            | Self::Decode { context, .. }
            | Self::Api { context, .. }
            | Self::InvalidHeader { context, .. } => context,
        }
    }

    /// PayPal's error body, for [`RequestError::Api`].
    #[must_use]
    pub const fn paypal_error(&self) -> Option<&PayPalError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }

    /// HTTP status of a non-2xx answer, or of a transport error that has one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { source, .. } => Some(source.status),
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Order {
        #[allow(dead_code)]
        id: String,
        #[allow(dead_code)]
        purchase_units: Vec<Unit>,
    }

    #[derive(Debug, Deserialize)]
    struct Unit {
        #[allow(dead_code)]
        quantity: u32,
    }

    #[test]
    fn test_decode_error_names_path_and_position() {
        let body = "{\"id\": \"5O1\",\n \"purchase_units\": [{\"quantity\": \"x\"}]}";
        let mut de = serde_json::Deserializer::from_str(body);
        let source = serde_path_to_error::deserialize::<_, Order>(&mut de).unwrap_err();
        let err = RequestError::decode("GET /v2/checkout/orders/{id}", source);
        match &err {
            RequestError::Decode { path, line, column, .. } => {
                assert_eq!(path, "purchase_units[0].quantity");
                assert_eq!(*line, 2);
                assert!(*column > 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.context(), "GET /v2/checkout/orders/{id}");
        let message = err.to_string();
        assert!(message.starts_with("failed to decode response: GET /v2/checkout/orders/{id}: "));
        assert!(message.contains("at `purchase_units[0].quantity`: "));
    }

    #[test]
    fn test_api_error_exposes_paypal_body() {
        let err = RequestError::Api {
            context: "GET /v1/invoicing/invoices/{id}",
            source: PayPalError::from_body(
                404,
                br#"{"name":"RESOURCE_NOT_FOUND","message":"Gone"}"#,
            ),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.paypal_error().map(|e| e.name.as_str()), Some("RESOURCE_NOT_FOUND"));
        assert!(RequestError::NotAuthenticated { context: "x" }.paypal_error().is_none());
    }
}
