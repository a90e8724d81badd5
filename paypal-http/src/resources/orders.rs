use http::Method;
use paypal::models::common::Patch;
use paypal::models::orders::{Order, OrderRequest};

use super::segment;
use crate::client::{Empty, PayPalClient};
use crate::error::RequestError;

/// `/v2/checkout/orders`.
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a PayPalClient,
}

impl<'a> Orders<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Creates an order. The buyer approves it at [`Order::approve_url`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(&self, order: &OrderRequest) -> Result<Order, RequestError> {
        self.client
            .post("v2/checkout/orders", order, "POST /v2/checkout/orders")
            .await
    }

    /// Shows an order.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<Order, RequestError> {
        self.client
            .get(
                &format!("v2/checkout/orders/{}", segment(id)),
                None,
                "GET /v2/checkout/orders/{id}",
            )
            .await
    }

    /// Applies JSON Patch operations to an order that is not yet completed.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn update(&self, id: &str, patch: &[Patch]) -> Result<(), RequestError> {
        self.client
            .patch(
                &format!("v2/checkout/orders/{}", segment(id)),
                patch,
                "PATCH /v2/checkout/orders/{id}",
            )
            .await
    }

    /// Authorizes an approved order with intent `AUTHORIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn authorize(&self, id: &str) -> Result<Order, RequestError> {
        self.client
            .call(
                Method::POST,
                &format!("v2/checkout/orders/{}/authorize", segment(id)),
                None,
                Some(&Empty),
                "POST /v2/checkout/orders/{id}/authorize",
            )
            .await
    }

    /// Captures an approved order with intent `CAPTURE`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn capture(&self, id: &str) -> Result<Order, RequestError> {
        self.client
            .call(
                Method::POST,
                &format!("v2/checkout/orders/{}/capture", segment(id)),
                None,
                Some(&Empty),
                "POST /v2/checkout/orders/{id}/capture",
            )
            .await
    }
}
