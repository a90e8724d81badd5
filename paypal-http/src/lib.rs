#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! reqwest transport for the PayPal REST APIs.
//!
//! A [`PayPalClient`] exchanges the configured credentials for an OAuth2
//! token, attaches it to every call, and decodes answers into the models of
//! the `paypal` crate. Per-API controllers hang off the client:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use paypal::{Configuration, QueryParameters};
//! use paypal_http::PayPalClient;
//!
//! let client = PayPalClient::new(Configuration::from_env()?);
//! client.authenticate().await?;
//! let invoices = client.invoices().list(&QueryParameters::new().with_page_size(20)).await?;
//! # let _ = invoices;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - [`PayPalClient`], [`ClientConfig`] and the request pipeline
//! - [`auth`] - Token snapshots and the shared [`TokenStore`]
//! - [`resources`] - One controller per API family
//! - [`headers`] - Basic credentials and the `PayPal-*` headers
//! - [`constants`] - Paths and header names
//! - [`error`] - [`RequestError`]
//!
//! # Features
//!
//! - `telemetry` (default): `tracing` spans per call and events for token
//!   refreshes, stale tokens and failures.

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod headers;
pub mod resources;

pub use auth::{AuthInfo, TokenStore};
pub use client::{Auth, ClientConfig, Empty, PayPalClient, TokenRefresh};
pub use error::RequestError;
pub use headers::PayPalHeaders;
