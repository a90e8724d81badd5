//! OAuth2 token state.
//!
//! [`AuthInfo`] is an immutable snapshot of one successful client-credentials
//! exchange. [`TokenStore`] holds the current snapshot and swaps it wholesale;
//! readers never observe a half-written token. Refreshes go through a gate so
//! that concurrent callers share one exchange instead of racing several.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

/// Body of a successful `POST /v1/oauth2/token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: String,
    /// Bearer token.
    pub access_token: String,
    /// Usually `Bearer`.
    pub token_type: String,
    /// Application id.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Server nonce.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// A bearer credential and what PayPal said about it.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthInfo {
    access_token: String,
    token_type: String,
    app_id: Option<String>,
    scopes: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
    nonce: Option<String>,
}

impl AuthInfo {
    /// A token with no expiry, scopes or app id.
    #[must_use]
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            app_id: None,
            scopes: Vec::new(),
            expires_at: None,
            nonce: None,
        }
    }

    /// Builds the snapshot for a token response received at `now`.
    ///
    /// Scopes are split on whitespace. An `expires_in` that overflows the
    /// calendar leaves `expires_at` unset, which reads as expired.
    #[must_use]
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let expires_at = TimeDelta::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime));
        Self {
            scopes: response.scope.split_whitespace().map(str::to_owned).collect(),
            access_token: response.access_token,
            token_type: response.token_type,
            app_id: response.app_id,
            expires_at,
            nonce: response.nonce,
        }
    }

    /// Sets the expiry instant.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the granted scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// The bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The token type, usually `Bearer`.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Application id.
    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Granted scopes.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// When the token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Server nonce.
    #[must_use]
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// `true` when no expiry is known or it has passed.
    #[must_use]
    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now())
    }

    /// [`is_token_expired`](Self::is_token_expired) evaluated at `now`.
    #[must_use]
    pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| now >= expires_at)
    }

    /// `Authorization` header value: `{token_type} {access_token}`.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInfo")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("app_id", &self.app_id)
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// When a refresh through [`TokenStore::refresh_with`] actually exchanges
/// credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Always, unless another caller finished a refresh while this one waited.
    Always,
    /// Only when no token is held or the held one is expired.
    IfNeeded,
}

/// The process-wide token cell shared by a client and its clones.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Option<Arc<AuthInfo>>>,
    generation: AtomicU64,
    gate: Mutex<()>,
}

impl TokenStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if any.
    pub async fn snapshot(&self) -> Option<Arc<AuthInfo>> {
        self.current.read().await.clone()
    }

    /// Number of snapshots stored so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replaces the snapshot.
    pub async fn replace(&self, info: AuthInfo) -> Arc<AuthInfo> {
        let info = Arc::new(info);
        let mut current = self.current.write().await;
        *current = Some(Arc::clone(&info));
        self.generation.fetch_add(1, Ordering::AcqRel);
        info
    }

    /// Drops the snapshot.
    pub async fn clear(&self) {
        let mut current = self.current.write().await;
        *current = None;
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    async fn fresh(&self) -> Option<Arc<AuthInfo>> {
        self.snapshot().await.filter(|info| !info.is_token_expired())
    }

    /// Runs `exchange` behind the refresh gate and stores its result.
    ///
    /// A caller that queued behind a refresh which then stored a fresh token
    /// adopts that token and skips `exchange`. A failed exchange leaves the
    /// store untouched; callers queued behind it try their own.
    ///
    /// # Errors
    ///
    /// Returns whatever `exchange` fails with.
    pub async fn refresh_with<F, Fut, E>(
        &self,
        mode: Refresh,
        exchange: F,
    ) -> Result<Arc<AuthInfo>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AuthInfo, E>>,
    {
        let observed = self.generation();
        if mode == Refresh::IfNeeded
            && let Some(info) = self.fresh().await
        {
            return Ok(info);
        }

        let _gate = self.gate.lock().await;
        if (mode == Refresh::IfNeeded || self.generation() != observed)
            && let Some(info) = self.fresh().await
        {
            return Ok(info);
        }

        let info = exchange().await?;
        Ok(self.replace(info).await)
    }
}
