use paypal::QueryParameters;
use paypal::models::vault::{CreditCard, CreditCardList, CreditCardRequest};

use super::segment;
use crate::client::PayPalClient;
use crate::error::RequestError;

/// `/v1/vault/credit-cards`.
#[derive(Debug, Clone, Copy)]
pub struct Vault<'a> {
    client: &'a PayPalClient,
}

impl<'a> Vault<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Stores a card. The answer carries the vault id and a masked number.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn store(&self, card: &CreditCardRequest) -> Result<CreditCard, RequestError> {
        self.client
            .post("v1/vault/credit-cards", card, "POST /v1/vault/credit-cards")
            .await
    }

    /// Lists stored cards. PayPal filters on `external_customer_id` and
    /// `merchant_id`; set them as custom query keys.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn list(&self, query: &QueryParameters) -> Result<CreditCardList, RequestError> {
        self.client
            .get("v1/vault/credit-cards", Some(query), "GET /v1/vault/credit-cards")
            .await
    }

    /// Shows a stored card.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<CreditCard, RequestError> {
        self.client
            .get(
                &format!("v1/vault/credit-cards/{}", segment(id)),
                None,
                "GET /v1/vault/credit-cards/{id}",
            )
            .await
    }

    /// Deletes a stored card.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), RequestError> {
        self.client
            .delete(
                &format!("v1/vault/credit-cards/{}", segment(id)),
                "DELETE /v1/vault/credit-cards/{id}",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use paypal::models::vault::{CardState, CardType};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::authenticated_client;

    #[tokio::test]
    async fn test_store_returns_masked_card() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/vault/credit-cards"))
            .and(body_partial_json(json!({
                "number": "4417119669820331",
                "type": "visa",
                "cvv2": "874"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "CARD-1MD19612EW4364010KGFNJQI",
                "state": "ok",
                "number": "xxxxxxxxxxxx0331",
                "type": "visa",
                "expire_month": "11",
                "expire_year": "2030",
                "valid_until": "2033-02-16T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let request = CreditCardRequest::new("4417119669820331", CardType::Visa, 11, 2030)
            .unwrap()
            .with_cvv2("874")
            .unwrap();
        let card = client.vault().store(&request).await.unwrap();
        assert_eq!(card.id, "CARD-1MD19612EW4364010KGFNJQI");
        assert_eq!(card.state, Some(CardState::Ok));
    }

    #[tokio::test]
    async fn test_list_filters_by_customer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vault/credit-cards"))
            .and(query_param("external_customer_id", "customer 123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "total_items": 0,
                "total_pages": 0
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let query = QueryParameters::new().with_custom("external_customer_id", "customer 123");
        let list = client.vault().list(&query).await.unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.total_items, Some(0));
    }

    #[tokio::test]
    async fn test_card_ids_are_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/vault/credit-cards/CARD%2F1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "name": "INVALID_RESOURCE_ID",
                "message": "Requested resource ID was not found."
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let err = client.vault().get("CARD/1").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
