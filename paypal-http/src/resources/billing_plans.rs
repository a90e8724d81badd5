use paypal::QueryParameters;
use paypal::models::billing::{BillingPlan, PatchRequest, PlanList, activate_patch};

use super::segment;
use crate::client::PayPalClient;
use crate::error::RequestError;

/// `/v1/payments/billing-plans`.
#[derive(Debug, Clone, Copy)]
pub struct BillingPlans<'a> {
    client: &'a PayPalClient,
}

impl<'a> BillingPlans<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Creates a plan in state `CREATED`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(&self, plan: &BillingPlan) -> Result<BillingPlan, RequestError> {
        self.client
            .post("v1/payments/billing-plans", plan, "POST /v1/payments/billing-plans")
            .await
    }

    /// Lists plans. PayPal filters on `status` and pages on `page` and
    /// `page_size`; set them through `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn list(&self, query: &QueryParameters) -> Result<PlanList, RequestError> {
        self.client
            .get("v1/payments/billing-plans", Some(query), "GET /v1/payments/billing-plans")
            .await
    }

    /// Shows a plan.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<BillingPlan, RequestError> {
        self.client
            .get(
                &format!("v1/payments/billing-plans/{}", segment(id)),
                None,
                "GET /v1/payments/billing-plans/{id}",
            )
            .await
    }

    /// Applies JSON Patch operations to a plan.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn update(&self, id: &str, patch: &PatchRequest) -> Result<(), RequestError> {
        self.client
            .patch(
                &format!("v1/payments/billing-plans/{}", segment(id)),
                patch,
                "PATCH /v1/payments/billing-plans/{id}",
            )
            .await
    }

    /// Moves a plan to `ACTIVE` so agreements can be created on it.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn activate(&self, id: &str) -> Result<(), RequestError> {
        self.update(id, &activate_patch()).await
    }
}
