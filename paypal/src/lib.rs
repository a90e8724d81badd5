#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the PayPal REST APIs.
//!
//! This crate holds everything about PayPal that does not need a network:
//! how resources look on the wire, which values PayPal will reject, and how
//! decimals, dates and list filters are encoded. The HTTP side lives in
//! `paypal-http`.
//!
//! # Modules
//!
//! - [`validation`] - [`Validated`] fields and the rules they enforce
//! - [`error`] - [`ValidationError`] and PayPal's own [`PayPalError`]
//! - [`amount`] - String-encoded decimals and the v1/v2 amount shapes
//! - [`date`] - ISO-8601, date-only and invoice date encodings
//! - [`config`] - Credentials and sandbox/live selection
//! - [`query`] - Query strings for list endpoints
//! - [`models`] - Resource models per API family

pub mod amount;
pub mod config;
pub mod date;
pub mod error;
pub mod models;
pub mod query;
pub mod validation;

pub use config::{Configuration, Environment};
pub use error::{PayPalError, ValidationError, ValidationErrorKind};
pub use query::{QueryParameters, SortOrder};
pub use validation::{Rule, Validated};
