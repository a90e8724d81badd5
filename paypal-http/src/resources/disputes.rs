use paypal::QueryParameters;
use paypal::models::disputes::{AcceptClaim, CustomerDispute, DisputeActions, DisputeList, Escalate};

use super::segment;
use crate::client::PayPalClient;
use crate::error::RequestError;

/// `/v1/customer/disputes`.
#[derive(Debug, Clone, Copy)]
pub struct Disputes<'a> {
    client: &'a PayPalClient,
}

impl<'a> Disputes<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Lists disputes.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn list(&self, query: &QueryParameters) -> Result<DisputeList, RequestError> {
        self.client
            .get("v1/customer/disputes", Some(query), "GET /v1/customer/disputes")
            .await
    }

    /// Shows a dispute.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<CustomerDispute, RequestError> {
        self.client
            .get(
                &format!("v1/customer/disputes/{}", segment(id)),
                None,
                "GET /v1/customer/disputes/{id}",
            )
            .await
    }

    /// Accepts liability and closes the dispute in the buyer's favour.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn accept_claim(
        &self,
        id: &str,
        accept: &AcceptClaim,
    ) -> Result<DisputeActions, RequestError> {
        self.client
            .post(
                &format!("v1/customer/disputes/{}/accept-claim", segment(id)),
                accept,
                "POST /v1/customer/disputes/{id}/accept-claim",
            )
            .await
    }

    /// Escalates an inquiry to a claim.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn escalate(
        &self,
        id: &str,
        escalate: &Escalate,
    ) -> Result<DisputeActions, RequestError> {
        self.client
            .post(
                &format!("v1/customer/disputes/{}/escalate", segment(id)),
                escalate,
                "POST /v1/customer/disputes/{id}/escalate",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use paypal::models::disputes::DisputeStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::authenticated_client;

    #[tokio::test]
    async fn test_list_and_accept_claim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customer/disputes"))
            .and(query_param("page_size", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "dispute_id": "PP-000-003-648-191",
                    "reason": "UNAUTHORISED",
                    "status": "WAITING_FOR_SELLER_RESPONSE",
                    "dispute_amount": {"currency_code": "USD", "value": "50.00"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/customer/disputes/PP-000-003-648-191/accept-claim"))
            .and(body_json(json!({"note": "Full refund to the customer."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "links": [{
                    "href": "https://api-m.paypal.com/v1/customer/disputes/PP-000-003-648-191",
                    "rel": "self",
                    "method": "GET"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;
        let disputes = client.disputes();

        let list = disputes
            .list(&QueryParameters::new().with_page_size(10))
            .await
            .unwrap();
        let dispute = &list.items[0];
        assert_eq!(dispute.status, DisputeStatus::WaitingForSellerResponse);

        let accept = AcceptClaim::new("Full refund to the customer.").unwrap();
        let actions = disputes
            .accept_claim(&dispute.dispute_id, &accept)
            .await
            .unwrap();
        assert_eq!(actions.links[0].rel, "self");
    }
}
