//! Paths and header names used on the wire.

/// OAuth2 token endpoint, relative to the environment base URL.
pub const TOKEN_PATH: &str = "v1/oauth2/token";

/// Grant type sent to [`TOKEN_PATH`].
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Locale requested from every endpoint.
pub const ACCEPT_LANGUAGE: &str = "en_US";

/// JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// Acts on behalf of another merchant.
pub const PAYPAL_AUTH_ASSERTION: &str = "PayPal-Auth-Assertion";

/// Device fingerprint for fraud checks.
pub const PAYPAL_CLIENT_METADATA_ID: &str = "PayPal-Client-Metadata-Id";

/// Partner attribution (BN code).
pub const PAYPAL_PARTNER_ATTRIBUTION_ID: &str = "PayPal-Partner-Attribution-Id";

/// Idempotency key.
pub const PAYPAL_REQUEST_ID: &str = "PayPal-Request-Id";
