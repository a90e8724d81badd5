//! Resource models, one module per API family.
//!
//! Every model maps its fields to PayPal's snake_case wire names through
//! serde attributes. Constrained strings are [`Validated`](crate::Validated)
//! so a model that decodes or constructs successfully is one PayPal will not
//! reject for length or format. Absent optional fields are left out of the
//! encoded body.

pub mod billing;
pub mod common;
pub mod disputes;
pub mod invoices;
pub mod managed_accounts;
pub mod orders;
pub mod payments;
pub mod vault;
