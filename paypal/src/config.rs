//! Client configuration: credentials and target environment.
//!
//! # Environment Variables
//!
//! [`Configuration::from_env`] reads:
//!
//! - `PAYPAL_CLIENT_ID`: REST app client id (required)
//! - `PAYPAL_CLIENT_SECRET`: REST app secret (required)
//! - `PAYPAL_ENVIRONMENT`: `sandbox` (default), `live`, or a base URL

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use url::Url;

/// Base URL of the sandbox REST API.
pub const SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com/";

/// Base URL of the live REST API.
pub const LIVE_URL: &str = "https://api-m.paypal.com/";

/// Errors raised while assembling a [`Configuration`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or not valid Unicode.
    #[error("missing environment variable `{0}`")]
    MissingVar(&'static str),

    /// The environment is neither `sandbox`, `live`, nor a parsable URL.
    #[error("invalid environment `{value}`: {source}")]
    InvalidEnvironment {
        /// The rejected input.
        value: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// Which PayPal deployment requests are sent to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// `api-m.sandbox.paypal.com`
    #[default]
    Sandbox,
    /// `api-m.paypal.com`
    Live,
    /// Any other base URL: a stub server, a proxy.
    Custom(Url),
}

impl Environment {
    /// Builds a custom environment, normalizing `url` to end in one `/` so
    /// relative API paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] if `url` does not parse.
    pub fn custom(url: &str) -> Result<Self, ConfigError> {
        let mut normalized = url.trim_end_matches('/').to_owned();
        normalized.push('/');
        Url::parse(&normalized)
            .map(Self::Custom)
            .map_err(|source| ConfigError::InvalidEnvironment {
                value: url.to_owned(),
                source,
            })
    }

    /// Returns the base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        match self {
            Self::Sandbox => Url::parse(SANDBOX_URL).expect("SANDBOX_URL is a valid URL"),
            Self::Live => Url::parse(LIVE_URL).expect("LIVE_URL is a valid URL"),
            Self::Custom(url) => url.clone(),
        }
    }

    /// Returns `true` for the live deployment.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" | "production" => Ok(Self::Live),
            _ => Self::custom(s.trim()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Live => f.write_str("live"),
            Self::Custom(url) => Display::fmt(url, f),
        }
    }
}

/// REST app credentials plus the environment they belong to.
///
/// Immutable once built; the transport only ever reads it.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    client_id: String,
    client_secret: String,
    environment: Environment,
}

impl Configuration {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
        }
    }

    /// Loads `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET` and
    /// `PAYPAL_ENVIRONMENT` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a credential is missing or the environment
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = std::env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| ConfigError::MissingVar("PAYPAL_CLIENT_ID"))?;
        let client_secret = std::env::var("PAYPAL_CLIENT_SECRET")
            .map_err(|_| ConfigError::MissingVar("PAYPAL_CLIENT_SECRET"))?;
        let environment = match std::env::var("PAYPAL_ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::default(),
        };
        Ok(Self::new(client_id, client_secret, environment))
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the target environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}
