use paypal::models::billing::{Agreement, AgreementStateDescriptor};

use super::segment;
use crate::client::{Empty, PayPalClient};
use crate::error::RequestError;

/// `/v1/payments/billing-agreements`.
#[derive(Debug, Clone, Copy)]
pub struct BillingAgreements<'a> {
    client: &'a PayPalClient,
}

impl<'a> BillingAgreements<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Creates an agreement on an active plan. The payer approves it at
    /// [`Agreement::approval_url`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(&self, agreement: &Agreement) -> Result<Agreement, RequestError> {
        self.client
            .post(
                "v1/payments/billing-agreements",
                agreement,
                "POST /v1/payments/billing-agreements",
            )
            .await
    }

    /// Executes an approved agreement, identified by the `token` from the
    /// return URL.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn execute(&self, token: &str) -> Result<Agreement, RequestError> {
        self.client
            .post(
                &format!("v1/payments/billing-agreements/{}/agreement-execute", segment(token)),
                &Empty,
                "POST /v1/payments/billing-agreements/{token}/agreement-execute",
            )
            .await
    }

    /// Shows an agreement.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<Agreement, RequestError> {
        self.client
            .get(
                &format!("v1/payments/billing-agreements/{}", segment(id)),
                None,
                "GET /v1/payments/billing-agreements/{id}",
            )
            .await
    }

    /// Suspends an active agreement.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn suspend(
        &self,
        id: &str,
        descriptor: &AgreementStateDescriptor,
    ) -> Result<(), RequestError> {
        const CONTEXT: &str = "POST /v1/payments/billing-agreements/{id}/suspend";
        self.transition(id, "suspend", descriptor, CONTEXT).await
    }

    /// Reactivates a suspended agreement.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn reactivate(
        &self,
        id: &str,
        descriptor: &AgreementStateDescriptor,
    ) -> Result<(), RequestError> {
        const CONTEXT: &str = "POST /v1/payments/billing-agreements/{id}/re-activate";
        self.transition(id, "re-activate", descriptor, CONTEXT).await
    }

    /// Cancels an agreement.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn cancel(
        &self,
        id: &str,
        descriptor: &AgreementStateDescriptor,
    ) -> Result<(), RequestError> {
        const CONTEXT: &str = "POST /v1/payments/billing-agreements/{id}/cancel";
        self.transition(id, "cancel", descriptor, CONTEXT).await
    }

    async fn transition(
        &self,
        id: &str,
        action: &str,
        descriptor: &AgreementStateDescriptor,
        context: &'static str,
    ) -> Result<(), RequestError> {
        self.client
            .post::<_, Empty>(
                &format!("v1/payments/billing-agreements/{}/{action}", segment(id)),
                descriptor,
                context,
            )
            .await
            .map(|Empty| ())
    }
}
