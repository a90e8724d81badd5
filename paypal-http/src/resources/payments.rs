use paypal::QueryParameters;
use paypal::models::payments::{Payment, PaymentExecution, PaymentList, PaymentRequest};

use super::segment;
use crate::client::PayPalClient;
use crate::error::RequestError;

/// `/v1/payments/payment`.
#[derive(Debug, Clone, Copy)]
pub struct Payments<'a> {
    client: &'a PayPalClient,
}

impl<'a> Payments<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Creates a payment.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(&self, payment: &PaymentRequest) -> Result<Payment, RequestError> {
        self.client
            .post("v1/payments/payment", payment, "POST /v1/payments/payment")
            .await
    }

    /// Executes a payment the payer approved.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn execute(
        &self,
        id: &str,
        execution: &PaymentExecution,
    ) -> Result<Payment, RequestError> {
        self.client
            .post(
                &format!("v1/payments/payment/{}/execute", segment(id)),
                execution,
                "POST /v1/payments/payment/{id}/execute",
            )
            .await
    }

    /// Shows a payment.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<Payment, RequestError> {
        self.client
            .get(
                &format!("v1/payments/payment/{}", segment(id)),
                None,
                "GET /v1/payments/payment/{id}",
            )
            .await
    }

    /// Lists payments, filtered and paged by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn list(&self, query: &QueryParameters) -> Result<PaymentList, RequestError> {
        self.client
            .get("v1/payments/payment", Some(query), "GET /v1/payments/payment")
            .await
    }
}
