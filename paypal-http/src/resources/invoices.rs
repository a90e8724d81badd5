use http::Method;
use paypal::QueryParameters;
use paypal::models::invoices::{Invoice, InvoiceList, InvoiceNumber, Notification};

use super::segment;
use crate::client::{Empty, PayPalClient};
use crate::error::RequestError;

/// `/v1/invoicing/invoices`.
#[derive(Debug, Clone, Copy)]
pub struct Invoices<'a> {
    client: &'a PayPalClient,
}

impl<'a> Invoices<'a> {
    pub(crate) const fn new(client: &'a PayPalClient) -> Self {
        Self { client }
    }

    /// Creates a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn create(&self, invoice: &Invoice) -> Result<Invoice, RequestError> {
        self.client
            .post("v1/invoicing/invoices", invoice, "POST /v1/invoicing/invoices")
            .await
    }

    /// Lists invoices, paged by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn list(&self, query: &QueryParameters) -> Result<InvoiceList, RequestError> {
        self.client
            .get("v1/invoicing/invoices", Some(query), "GET /v1/invoicing/invoices")
            .await
    }

    /// Shows an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn get(&self, id: &str) -> Result<Invoice, RequestError> {
        self.client
            .get(
                &format!("v1/invoicing/invoices/{}", segment(id)),
                None,
                "GET /v1/invoicing/invoices/{id}",
            )
            .await
    }

    /// Replaces a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn update(&self, id: &str, invoice: &Invoice) -> Result<Invoice, RequestError> {
        self.client
            .put(
                &format!("v1/invoicing/invoices/{}", segment(id)),
                invoice,
                "PUT /v1/invoicing/invoices/{id}",
            )
            .await
    }

    /// Deletes a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), RequestError> {
        self.client
            .delete(
                &format!("v1/invoicing/invoices/{}", segment(id)),
                "DELETE /v1/invoicing/invoices/{id}",
            )
            .await
    }

    /// Sends a draft invoice to its billing contacts. With `notify_merchant`
    /// the merchant receives a copy.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn send(&self, id: &str, notify_merchant: bool) -> Result<(), RequestError> {
        let query =
            QueryParameters::new().with_custom("notify_merchant", notify_merchant.to_string());
        self.client
            .call::<_, Empty>(
                Method::POST,
                &format!("v1/invoicing/invoices/{}/send", segment(id)),
                Some(&query),
                Some(&Empty),
                "POST /v1/invoicing/invoices/{id}/send",
            )
            .await
            .map(|Empty| ())
    }

    /// Reminds the payer of a sent invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn remind(&self, id: &str, notification: &Notification) -> Result<(), RequestError> {
        self.client
            .post::<_, Empty>(
                &format!("v1/invoicing/invoices/{}/remind", segment(id)),
                notification,
                "POST /v1/invoicing/invoices/{id}/remind",
            )
            .await
            .map(|Empty| ())
    }

    /// Cancels a sent invoice.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn cancel(&self, id: &str, notification: &Notification) -> Result<(), RequestError> {
        self.client
            .post::<_, Empty>(
                &format!("v1/invoicing/invoices/{}/cancel", segment(id)),
                notification,
                "POST /v1/invoicing/invoices/{id}/cancel",
            )
            .await
            .map(|Empty| ())
    }

    /// Reserves the next invoice number.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the call fails.
    pub async fn next_invoice_number(&self) -> Result<InvoiceNumber, RequestError> {
        self.client
            .post(
                "v1/invoicing/invoices/next-invoice-number",
                &Empty,
                "POST /v1/invoicing/invoices/next-invoice-number",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use paypal::models::invoices::{BillingInfo, InvoiceStatus, MerchantInfo};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::authenticated_client;

    #[tokio::test]
    async fn test_create_then_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/invoicing/invoices"))
            .and(body_json(json!({
                "merchant_info": {"email": "merchant@example.com"},
                "billing_info": [{"email": "buyer@example.com"}]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "INV2-8ZVH-2PRV-2SB3-TDAA",
                "number": "0001",
                "status": "DRAFT",
                "merchant_info": {"email": "merchant@example.com"},
                "billing_info": [{"email": "buyer@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/invoicing/invoices/INV2-8ZVH-2PRV-2SB3-TDAA/send"))
            .and(query_param("notify_merchant", "true"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let invoice = Invoice::new(MerchantInfo::new("merchant@example.com").unwrap())
            .with_billing_info(BillingInfo::email("buyer@example.com").unwrap())
            .unwrap();
        let created = client.invoices().create(&invoice).await.unwrap();
        assert_eq!(created.status, Some(InvoiceStatus::Draft));

        let id = created.id.unwrap();
        client.invoices().send(&id, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_decodes_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/invoicing/invoices"))
            .and(query_param("page_size", "2"))
            .and(query_param("total_count_required", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 5,
                "invoices": [
                    {"id": "INV2-1", "status": "SENT", "merchant_info": {"email": "a@example.com"}},
                    {"id": "INV2-2", "status": "PAID", "merchant_info": {"email": "a@example.com"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let query = QueryParameters::new().with_page_size(2).with_total_count();
        let list = client.invoices().list(&query).await.unwrap();
        assert_eq!(list.total_count, Some(5));
        assert_eq!(list.invoices[1].status, Some(InvoiceStatus::Paid));
    }

    #[tokio::test]
    async fn test_cancel_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/invoicing/invoices/INV2-1/cancel"))
            .and(body_json(json!({
                "subject": "Past due",
                "note": "Canceling invoice",
                "send_to_merchant": true,
                "send_to_payer": true
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/invoicing/invoices/INV2-2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let mut notification = Notification::new("Past due", "Canceling invoice").unwrap();
        notification.send_to_merchant = Some(true);
        notification.send_to_payer = Some(true);
        client.invoices().cancel("INV2-1", &notification).await.unwrap();
        client.invoices().delete("INV2-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_rejects_overlong_field_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/invoicing/invoices/INV2-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "INV2-1",
                "status": "DRAFT",
                "merchant_info": {"email": "merchant@example.com"},
                "merchant_memo": "m".repeat(501)
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = authenticated_client(&server).await;

        let err = client.invoices().get("INV2-1").await.unwrap_err();
        match &err {
            RequestError::Decode { context, path, source, .. } => {
                assert_eq!(*context, "GET /v1/invoicing/invoices/{id}");
                assert_eq!(path, "merchant_memo");
                assert!(source.to_string().starts_with("invalidLength: "));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("merchant_memo"));
    }
}
