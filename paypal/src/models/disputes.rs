//! v1 Customer disputes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::amount::Money;
use crate::date::iso8601_option;
use crate::error::ValidationError;
use crate::models::common::LinkDescription;
use crate::validation::{Text, Validated};

/// Why the buyer opened the dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeReason {
    /// Goods or service never arrived.
    MerchandiseOrServiceNotReceived,
    /// Goods or service differ from the listing.
    MerchandiseOrServiceNotAsDescribed,
    /// The buyer did not authorize the payment.
    Unauthorised,
    /// A promised refund did not arrive.
    CreditNotProcessed,
    /// Charged twice.
    DuplicateTransaction,
    /// Charged the wrong amount.
    IncorrectAmount,
    /// Already paid another way.
    PaymentByOtherMeans,
    /// A cancelled subscription kept billing.
    CanceledRecurringBilling,
    /// Remittance problem.
    ProblemWithRemittance,
    /// Anything else.
    Other,
    /// A reason this version does not know.
    #[serde(other)]
    Unknown,
}

/// Where the dispute stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Open.
    Open,
    /// Waiting for the buyer.
    WaitingForBuyerResponse,
    /// Waiting for the seller.
    WaitingForSellerResponse,
    /// PayPal is reviewing it.
    UnderReview,
    /// Closed.
    Resolved,
    /// Anything else.
    Other,
    /// A status this version does not know.
    #[serde(other)]
    Unknown,
}

/// Dispute stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeLifeCycleStage {
    /// Buyer and seller negotiate.
    Inquiry,
    /// Escalated to a claim.
    Chargeback,
    /// Appeal of a chargeback.
    PreArbitration,
    /// Final appeal.
    Arbitration,
    /// A stage this version does not know.
    #[serde(other)]
    Unknown,
}

/// A transaction the dispute concerns.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputedTransaction {
    /// Seller-side transaction id.
    #[serde(default)]
    pub seller_transaction_id: Option<String>,
    /// Buyer-side transaction id.
    #[serde(default)]
    pub buyer_transaction_id: Option<String>,
    /// When the transaction happened.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Transaction status.
    #[serde(default)]
    pub transaction_status: Option<String>,
    /// Gross amount.
    #[serde(default)]
    pub gross_amount: Option<Money>,
    /// Merchant's invoice number.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Merchant's custom field.
    #[serde(default)]
    pub custom: Option<String>,
}

/// A message posted on the dispute.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeMessage {
    /// `BUYER` or `SELLER`.
    #[serde(default)]
    pub posted_by: Option<String>,
    /// When it was posted.
    #[serde(default, with = "iso8601_option")]
    pub time_posted: Option<DateTime<Utc>>,
    /// Text.
    #[serde(default)]
    pub content: Option<String>,
}

/// A customer dispute. List responses carry only a subset of these fields.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDispute {
    /// Dispute id.
    pub dispute_id: String,
    /// Opened at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last updated at.
    #[serde(default, with = "iso8601_option")]
    pub update_time: Option<DateTime<Utc>>,
    /// Transactions under dispute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disputed_transactions: Vec<DisputedTransaction>,
    /// Reason.
    pub reason: DisputeReason,
    /// Status.
    pub status: DisputeStatus,
    /// Disputed amount.
    #[serde(default)]
    pub dispute_amount: Option<Money>,
    /// Stage.
    #[serde(default)]
    pub dispute_life_cycle_stage: Option<DisputeLifeCycleStage>,
    /// Channel the buyer used.
    #[serde(default)]
    pub dispute_channel: Option<String>,
    /// Messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<DisputeMessage>,
    /// Deadline for the seller to respond.
    #[serde(default, with = "iso8601_option")]
    pub seller_response_due_date: Option<DateTime<Utc>>,
    /// Available actions as links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// A page of disputes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeList {
    /// Disputes.
    #[serde(default)]
    pub items: Vec<CustomerDispute>,
    /// Pagination links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// Why the seller accepts the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcceptClaimReason {
    /// Did not ship the item.
    DidNotShipItem,
    /// Too late to ship.
    TooTimeConsumingToShip,
    /// Lost in transit.
    LostInMail,
    /// Unlikely to win the case.
    NotAbleToWinCase,
    /// Company policy.
    CompanyPolicy,
    /// No reason given.
    ReasonNotSet,
}

/// Body of `POST /v1/customer/disputes/{id}/accept-claim`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptClaim {
    /// Note to the buyer and PayPal.
    pub note: Text<0, 2000>,
    /// Reason.
    #[serde(default)]
    pub accept_claim_reason: Option<AcceptClaimReason>,
    /// Amount refunded; the disputed amount when absent.
    #[serde(default)]
    pub refund_amount: Option<Money>,
}

impl AcceptClaim {
    /// A claim acceptance with `note`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `note` is over 2000 characters.
    pub fn new(note: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            note: Validated::new(note).map_err(|e| e.at("note"))?,
            accept_claim_reason: None,
            refund_amount: None,
        })
    }

    /// Sets the refund amount.
    #[must_use]
    pub fn with_refund(mut self, amount: Money) -> Self {
        self.refund_amount = Some(amount);
        self
    }
}

/// Body of `POST /v1/customer/disputes/{id}/escalate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalate {
    /// Why the dispute is escalated.
    pub note: Text<1, 2000>,
}

impl Escalate {
    /// An escalation with `note`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `note` is empty or over 2000 characters.
    pub fn new(note: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            note: Validated::new(note).map_err(|e| e.at("note"))?,
        })
    }
}

/// Answer to a dispute action: links to the follow-up calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeActions {
    /// Follow-up links, usually `self`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::MonetaryAmount;
    use serde_json::json;

    #[test]
    fn test_dispute_list_decodes() {
        let list: DisputeList = serde_json::from_value(json!({
            "items": [{
                "dispute_id": "PP-000-003-648-191",
                "create_time": "2017-01-24T10:41:35.000Z",
                "update_time": "2017-01-24T11:40:32.000Z",
                "reason": "UNAUTHORISED",
                "status": "WAITING_FOR_SELLER_RESPONSE",
                "dispute_amount": {"currency_code": "USD", "value": "50.00"},
                "links": [{
                    "href": "https://api-m.paypal.com/v1/customer/disputes/PP-000-003-648-191",
                    "rel": "self",
                    "method": "GET"
                }]
            }],
            "links": [{
                "href": "https://api-m.sandbox.paypal.com/v1/customer/disputes",
                "rel": "self",
                "method": "GET"
            }]
        }))
        .unwrap();
        let dispute = &list.items[0];
        assert_eq!(dispute.reason, DisputeReason::Unauthorised);
        assert_eq!(dispute.status, DisputeStatus::WaitingForSellerResponse);
        assert_eq!(dispute.dispute_amount.as_ref().map(MonetaryAmount::currency), Some("USD"));
    }

    #[test]
    fn test_dispute_detail_decodes() {
        let dispute: CustomerDispute = serde_json::from_value(json!({
            "dispute_id": "PP-D-4012",
            "reason": "MERCHANDISE_OR_SERVICE_NOT_RECEIVED",
            "status": "UNDER_REVIEW",
            "dispute_life_cycle_stage": "CHARGEBACK",
            "disputed_transactions": [{
                "seller_transaction_id": "3BC38643YC807283D",
                "gross_amount": {"currency_code": "USD", "value": "192.00"}
            }],
            "messages": [{
                "posted_by": "BUYER",
                "time_posted": "2018-06-12T23:17:08.000Z",
                "content": "Where is it?"
            }],
            "seller_response_due_date": "2018-07-03T23:59:59.000Z"
        }))
        .unwrap();
        assert_eq!(dispute.dispute_life_cycle_stage, Some(DisputeLifeCycleStage::Chargeback));
        assert_eq!(dispute.messages[0].content.as_deref(), Some("Where is it?"));
    }

    #[test]
    fn test_accept_claim_note_limit() {
        let accept = AcceptClaim::new(&"n".repeat(2000)).unwrap();
        assert_eq!(accept.note.len(), 2000);
        let err = AcceptClaim::new(&"n".repeat(2001)).unwrap_err();
        assert_eq!(err.field(), Some("note"));
        assert!(Escalate::new("").is_err());
    }

    #[test]
    fn test_accept_claim_wire_shape() {
        let accept = AcceptClaim::new("Full refund to the customer.")
            .unwrap()
            .with_refund(Money::from_parts("USD", "10.00".parse().unwrap()).unwrap());
        assert_eq!(
            serde_json::to_value(&accept).unwrap(),
            json!({
                "note": "Full refund to the customer.",
                "refund_amount": {"currency_code": "USD", "value": "10.00"}
            })
        );
    }
}
