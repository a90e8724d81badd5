use paypal::models::managed_accounts::{ManagedAccount, ManagedAccountResponse};

use super::segment;
use crate::client::PayPalClient;
use crate::error::RequestError;

/// `/v3/customer/managed-accounts`.
#[derive(Debug, Clone, Copy)]
pub struct ManagedAccounts<'a> {
    client: &'a PayPalClient,
}

impl<'a> ManagedAccounts<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Onboards a merchant under the calling partner.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(
        &self,
        account: &ManagedAccount,
    ) -> Result<ManagedAccountResponse, RequestError> {
        self.client
            .post(
                "v3/customer/managed-accounts",
                account,
                "POST /v3/customer/managed-accounts",
            )
            .await
    }

    /// Shows a managed account.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, account_id: &str) -> Result<ManagedAccountResponse, RequestError> {
        self.client
            .get(
                &format!("v3/customer/managed-accounts/{}", segment(account_id)),
                None,
                "GET /v3/customer/managed-accounts/{id}",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use paypal::models::managed_accounts::{BusinessDetails, BusinessType};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::authenticated_client;

    #[tokio::test]
    async fn test_create_posts_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/customer/managed-accounts"))
            .and(body_partial_json(json!({
                "email_address": "merchant@example.com",
                "country_code": "US"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "account_id": "YQZCHTGHUK5P8",
                "external_id": "partner-42"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let account = ManagedAccount::new(
            "merchant@example.com",
            "US",
            BusinessDetails::new("Acme Widgets", BusinessType::Corporation).unwrap(),
        )
        .unwrap()
        .with_external_id("partner-42")
        .unwrap();
        let response = client.managed_accounts().create(&account).await.unwrap();
        assert_eq!(response.account_id, "YQZCHTGHUK5P8");
        assert_eq!(response.external_id.as_deref(), Some("partner-42"));
    }
}
