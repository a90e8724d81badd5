//! [`PayPalClient`]: the OAuth2 exchange and the request pipeline every
//! resource controller goes through.
//!
//! ## Token handling
//!
//! Clones of a client share one [`TokenStore`]. [`PayPalClient::authenticate`]
//! always exchanges credentials; [`PayPalClient::ensure_authenticated`] does so
//! only when no usable token is held. Both coalesce concurrent callers into a
//! single exchange.
//!
//! Under [`TokenRefresh::Manual`] an authenticated call made before any token
//! was obtained fails with [`RequestError::NotAuthenticated`] without touching
//! the network, and an expired token is still attached (with a `warn` event).
//! Under [`TokenRefresh::Automatic`] every call runs
//! [`PayPalClient::ensure_authenticated`] first.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use http::{Method, StatusCode};
use paypal::{Configuration, PayPalError, QueryParameters};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Instrument, Span, instrument};

use crate::auth::{AuthInfo, Refresh, TokenResponse, TokenStore};
use crate::constants::{self, APPLICATION_JSON, GRANT_TYPE_CLIENT_CREDENTIALS, TOKEN_PATH};
use crate::error::RequestError;
use crate::headers::{PayPalHeaders, basic_credentials};

/// A body that carries nothing.
///
/// Serializes as `{}` for POSTs that take no input, and deserializes from any
/// response, including `204 No Content`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl Serialize for Empty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_map(Some(0))?.end()
    }
}

impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer).map(|_| Self)
    }
}

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach `Authorization: {token_type} {access_token}`; JSON body.
    Bearer,
    /// No token; form-encoded body. Used by the token exchange.
    None,
}

/// When the client obtains tokens on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenRefresh {
    /// Only when [`PayPalClient::authenticate`] or
    /// [`PayPalClient::ensure_authenticated`] is called.
    #[default]
    Manual,
    /// Before every authenticated call, when no fresh token is held.
    Automatic,
}

/// HTTP settings layered on top of a [`Configuration`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    timeout: Option<Duration>,
    headers: HeaderMap,
    http: Option<Client>,
    token_refresh: TokenRefresh,
}

impl ClientConfig {
    /// Defaults: no timeout, no extra headers, a fresh `reqwest::Client`,
    /// manual token refresh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds headers sent with every request, replacing same-named ones.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Adds the set `PayPal-*` headers to every request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidHeader`] if a value is not a valid
    /// header value.
    pub fn with_paypal_headers(self, headers: &PayPalHeaders) -> Result<Self, RequestError> {
        Ok(self.with_headers(headers.to_header_map()?))
    }

    /// Sends through `client` instead of a fresh one.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Sets the token refresh policy.
    #[must_use]
    pub const fn with_token_refresh(mut self, token_refresh: TokenRefresh) -> Self {
        self.token_refresh = token_refresh;
        self
    }
}

/// A client for the PayPal REST APIs.
#[derive(Clone, Debug)]
pub struct PayPalClient {
    configuration: Arc<Configuration>,
    base_url: Url,
    http: Client,
    headers: HeaderMap,
    timeout: Option<Duration>,
    token_refresh: TokenRefresh,
    tokens: Arc<TokenStore>,
}

impl PayPalClient {
    /// A client with default HTTP settings.
    #[must_use]
    pub fn new(configuration: Configuration) -> Self {
        Self::with_config(configuration, ClientConfig::default())
    }

    /// A client with the given HTTP settings.
    #[must_use]
    pub fn with_config(configuration: Configuration, config: ClientConfig) -> Self {
        Self {
            base_url: configuration.environment().base_url(),
            configuration: Arc::new(configuration),
            http: config.http.unwrap_or_default(),
            headers: config.headers,
            timeout: config.timeout,
            token_refresh: config.token_refresh,
            tokens: Arc::new(TokenStore::new()),
        }
    }

    /// Credentials and environment.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Base URL every path is joined to; ends in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Token refresh policy.
    #[must_use]
    pub const fn token_refresh(&self) -> TokenRefresh {
        self.token_refresh
    }

    /// The token cell shared with every clone of this client.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The current token, if one was obtained.
    pub async fn auth_info(&self) -> Option<Arc<AuthInfo>> {
        self.tokens.snapshot().await
    }

    /// Exchanges the client credentials for a new token and stores it.
    ///
    /// Callers that arrive while an exchange is in flight wait for it and
    /// share its token.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Api`] with PayPal's OAuth error when the
    /// credentials are refused, or a transport or decode error. The stored
    /// token is left as it was.
    pub async fn authenticate(&self) -> Result<Arc<AuthInfo>, RequestError> {
        self.tokens
            .refresh_with(Refresh::Always, || self.exchange_credentials())
            .await
    }

    /// Returns the held token, exchanging credentials first when none is held
    /// or it has expired.
    ///
    /// # Errors
    ///
    /// Same as [`authenticate`](Self::authenticate).
    pub async fn ensure_authenticated(&self) -> Result<Arc<AuthInfo>, RequestError> {
        self.tokens
            .refresh_with(Refresh::IfNeeded, || self.exchange_credentials())
            .await
    }

    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "paypal.authenticate", skip_all, err)
    )]
    async fn exchange_credentials(&self) -> Result<AuthInfo, RequestError> {
        const CONTEXT: &str = "POST /v1/oauth2/token";
        let credentials = basic_credentials(
            self.configuration.client_id(),
            self.configuration.client_secret(),
        );
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive_header(&credentials, CONTEXT)?);
        let form = [("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS)];
        let request = self
            .build_request(Method::POST, TOKEN_PATH, &headers, Auth::None, Some(&form), CONTEXT)
            .await?;
        let response: TokenResponse = self.send(request, CONTEXT).await?;

        #[cfg(feature = "telemetry")]
        tracing::info!(
            app_id = response.app_id.as_deref().unwrap_or_default(),
            scopes = response.scope.split_whitespace().count(),
            expires_in = response.expires_in,
            "paypal.token_refreshed"
        );

        Ok(AuthInfo::from_response(response, Utc::now()))
    }

    /// Composes a request for `path`, relative to the environment base URL.
    ///
    /// Client headers are applied first, then `headers`. With [`Auth::Bearer`]
    /// the stored token is attached and `body` is sent as JSON; with
    /// [`Auth::None`] `body` is form-encoded. No token refresh happens here.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NotAuthenticated`] for [`Auth::Bearer`] when no
    /// token is held, before any I/O. Also fails on an unjoinable `path`, a
    /// body that does not serialize, or an invalid header value.
    pub async fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
        auth: Auth,
        body: Option<&B>,
        context: &'static str,
    ) -> Result<reqwest::Request, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| RequestError::UrlParse { context, source })?;

        let mut merged = self.headers.clone();
        merged.extend(headers.clone());
        merged.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        merged.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(constants::ACCEPT_LANGUAGE));

        if auth == Auth::Bearer {
            let info = self
                .tokens
                .snapshot()
                .await
                .filter(|info| !info.access_token().is_empty() && !info.token_type().is_empty())
                .ok_or(RequestError::NotAuthenticated { context })?;
            #[cfg(feature = "telemetry")]
            if info.is_token_expired() {
                tracing::warn!(
                    context,
                    expires_at = ?info.expires_at(),
                    "paypal.stale_token: sending an expired access token"
                );
            }
            merged.insert(AUTHORIZATION, sensitive_header(&info.authorization(), context)?);
        }

        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = match auth {
                Auth::Bearer => {
                    let json = serde_json::to_vec(body)
                        .map_err(|source| RequestError::Encode { context, source })?;
                    merged.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                    req.body(json)
                }
                Auth::None => req.form(body),
            };
        }
        req = req.headers(merged);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req.build()
            .map_err(|source| RequestError::Http { context, source })
    }

    /// Sends `request` and decodes the answer.
    ///
    /// A 2xx body decodes into `R`; an empty body or `204` decodes as JSON
    /// `null`, which [`Empty`] and `Option<_>` accept.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Api`] for a non-2xx status, with PayPal's
    /// error body and the status. Returns [`RequestError::Decode`] when a 2xx
    /// body does not fit `R`, and [`RequestError::Http`] on transport failure.
    pub async fn send<R>(
        &self,
        request: reqwest::Request,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| RequestError::Http { context, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| RequestError::Http { context, source })?;
        if !status.is_success() {
            return Err(RequestError::Api {
                context,
                source: PayPalError::from_body(status.as_u16(), &body),
            });
        }
        decode_body(status, &body, context)
    }

    /// Sends an authenticated call and decodes its answer.
    ///
    /// `query` is appended to `path`. `context` names the call in errors and
    /// telemetry, e.g. `"GET /v1/invoicing/invoices/{id}"`.
    ///
    /// # Errors
    ///
    /// See [`build_request`](Self::build_request) and [`send`](Self::send).
    pub async fn call<B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParameters>,
        body: Option<&B>,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call_with_headers(method, path, query, &HeaderMap::new(), body, context)
            .await
    }

    /// [`call`](Self::call) with extra headers for this request only.
    ///
    /// # Errors
    ///
    /// See [`build_request`](Self::build_request) and [`send`](Self::send).
    #[cfg(feature = "telemetry")]
    pub async fn call_with_headers<B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParameters>,
        headers: &HeaderMap,
        body: Option<&B>,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let span = tracing::info_span!(
            "paypal.request",
            method = %method,
            path = %path,
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty,
        );
        with_span(self.dispatch(method, path, query, headers, body, context), span).await
    }

    /// [`call`](Self::call) with extra headers for this request only.
    ///
    /// # Errors
    ///
    /// See [`build_request`](Self::build_request) and [`send`](Self::send).
    #[cfg(not(feature = "telemetry"))]
    pub async fn call_with_headers<B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParameters>,
        headers: &HeaderMap,
        body: Option<&B>,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.dispatch(method, path, query, headers, body, context).await
    }

    async fn dispatch<B, R>(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParameters>,
        headers: &HeaderMap,
        body: Option<&B>,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result: Result<R, RequestError> = async {
            if self.token_refresh == TokenRefresh::Automatic {
                self.ensure_authenticated().await?;
            }
            let path = match query {
                Some(query) if !query.is_empty() => format!("{path}?{}", query.encode()),
                _ => path.to_owned(),
            };
            let request = self
                .build_request(method, &path, headers, Auth::Bearer, body, context)
                .await?;
            self.send(request, context).await
        }
        .await;

        record_result_on_span(&result);

        result
    }

    pub(crate) async fn get<R>(
        &self,
        path: &str,
        query: Option<&QueryParameters>,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        R: DeserializeOwned,
    {
        self.call::<Empty, R>(Method::GET, path, query, None, context)
            .await
    }

    pub(crate) async fn post<B, R>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(Method::POST, path, None, Some(body), context)
            .await
    }

    pub(crate) async fn put<B, R>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(Method::PUT, path, None, Some(body), context)
            .await
    }

    pub(crate) async fn patch<B>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<(), RequestError>
    where
        B: Serialize + ?Sized,
    {
        self.call::<B, Empty>(Method::PATCH, path, None, Some(body), context)
            .await
            .map(|Empty| ())
    }

    pub(crate) async fn delete(
        &self,
        path: &str,
        context: &'static str,
    ) -> Result<(), RequestError> {
        self.call::<Empty, Empty>(Method::DELETE, path, None, None, context)
            .await
            .map(|Empty| ())
    }
}

fn decode_body<R>(status: StatusCode, body: &[u8], context: &'static str) -> Result<R, RequestError>
where
    R: DeserializeOwned,
{
    let body = if status == StatusCode::NO_CONTENT || body.trim_ascii().is_empty() {
        b"null".as_slice()
    } else {
        body
    };
    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de)
        .map_err(|error| RequestError::decode(context, error))?;
    de.end()
        .map_err(|source| RequestError::decode_at(context, ".".to_owned(), source))?;
    Ok(value)
}

fn sensitive_header(value: &str, context: &'static str) -> Result<HeaderValue, RequestError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|source| RequestError::InvalidHeader { context, source })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Records the outcome on the current span and logs failures.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "PayPal request failed");
        }
    }
}

#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(feature = "telemetry")]
fn with_span<F: Future>(fut: F, span: Span) -> impl Future<Output = F::Output> {
    fut.instrument(span)
}
