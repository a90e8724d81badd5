//! Header values PayPal expects: Basic credentials for the token exchange
//! and the optional pass-through `PayPal-*` headers.

use base64::prelude::*;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::constants::{
    PAYPAL_AUTH_ASSERTION, PAYPAL_CLIENT_METADATA_ID, PAYPAL_PARTNER_ATTRIBUTION_ID,
    PAYPAL_REQUEST_ID,
};
use crate::error::RequestError;

/// `Basic base64(client_id:client_secret)`.
#[must_use]
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    payer_id: &'a str,
}

/// Builds an unsigned `PayPal-Auth-Assertion` JWT so a platform can act on
/// behalf of the merchant `payer_id`.
///
/// # Errors
///
/// Returns [`RequestError::Encode`] if the claims fail to serialize.
pub fn auth_assertion(client_id: &str, payer_id: &str) -> Result<String, RequestError> {
    let claims = serde_json::to_vec(&AssertionClaims {
        iss: client_id,
        payer_id,
    })
    .map_err(|source| RequestError::Encode {
        context: "PayPal-Auth-Assertion",
        source,
    })?;
    Ok(format!(
        "{}.{}.",
        BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
        BASE64_URL_SAFE_NO_PAD.encode(claims)
    ))
}

/// Optional `PayPal-*` headers attached to every call of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayPalHeaders {
    auth_assertion: Option<String>,
    client_metadata_id: Option<String>,
    partner_attribution_id: Option<String>,
    request_id: Option<String>,
}

impl PayPalHeaders {
    /// No headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `PayPal-Auth-Assertion`; see [`auth_assertion`].
    #[must_use]
    pub fn with_auth_assertion(mut self, value: impl Into<String>) -> Self {
        self.auth_assertion = Some(value.into());
        self
    }

    /// Sets `PayPal-Client-Metadata-Id`.
    #[must_use]
    pub fn with_client_metadata_id(mut self, value: impl Into<String>) -> Self {
        self.client_metadata_id = Some(value.into());
        self
    }

    /// Sets `PayPal-Partner-Attribution-Id`.
    #[must_use]
    pub fn with_partner_attribution_id(mut self, value: impl Into<String>) -> Self {
        self.partner_attribution_id = Some(value.into());
        self
    }

    /// Sets `PayPal-Request-Id`.
    #[must_use]
    pub fn with_request_id(mut self, value: impl Into<String>) -> Self {
        self.request_id = Some(value.into());
        self
    }

    /// Renders the set headers.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidHeader`] if a value is not a valid
    /// header value.
    pub fn to_header_map(&self) -> Result<HeaderMap, RequestError> {
        let mut map = HeaderMap::new();
        let entries = [
            (PAYPAL_AUTH_ASSERTION, "paypal-auth-assertion", &self.auth_assertion),
            (PAYPAL_CLIENT_METADATA_ID, "paypal-client-metadata-id", &self.client_metadata_id),
            (
                PAYPAL_PARTNER_ATTRIBUTION_ID,
                "paypal-partner-attribution-id",
                &self.partner_attribution_id,
            ),
            (PAYPAL_REQUEST_ID, "paypal-request-id", &self.request_id),
        ];
        for (context, name, value) in entries {
            if let Some(value) = value {
                let value = HeaderValue::from_str(value)
                    .map_err(|source| RequestError::InvalidHeader { context, source })?;
                map.insert(HeaderName::from_static(name), value);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_credentials() {
        assert_eq!(basic_credentials("id", "secret"), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn test_auth_assertion_is_unsigned_jwt() {
        let client_id = "AdV4d6nLHabWLyemrw4BKdO9LjcnioNIOgoz7vD611ObbDUL0kJQfzrdhXEBwnH8QkV_4SBr";
        let jwt = auth_assertion(client_id, "MERCHANT1").unwrap();
        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "eyJhbGciOiJub25lIn0");
        assert_eq!(parts[2], "");
        let claims: serde_json::Value =
            serde_json::from_slice(&BASE64_URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["payer_id"], "MERCHANT1");
    }

    #[test]
    fn test_header_map_only_carries_set_headers() {
        let map = PayPalHeaders::new()
            .with_request_id("7b92603e-77ed-4896-8e78-5dea2050476a")
            .with_partner_attribution_id("Example_BN")
            .to_header_map()
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[PAYPAL_REQUEST_ID], "7b92603e-77ed-4896-8e78-5dea2050476a");
        assert_eq!(map["paypal-partner-attribution-id"], "Example_BN");
    }

    #[test]
    fn test_header_map_rejects_control_characters() {
        let err = PayPalHeaders::new()
            .with_client_metadata_id("bad\nvalue")
            .to_header_map()
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidHeader {
                context: PAYPAL_CLIENT_METADATA_ID,
                ..
            }
        ));
    }
}
