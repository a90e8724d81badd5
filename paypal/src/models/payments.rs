//! v1 Payments: PayPal and card payments with a redirect-then-execute flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::amount::{Amount, Currency, CurrencyCodeField, MonetaryAmount, NumericString};
use crate::date::{InvoiceDate, iso8601_option};
use crate::error::ValidationError;
use crate::models::common::{Address, LinkDescription};
use crate::validation::{EmailAddress, Length, Text, Validated};

/// How the payment completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentIntent {
    /// Immediate payment.
    Sale,
    /// Authorize for later capture.
    Authorize,
    /// Create an order for later authorization.
    Order,
}

/// Funding instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// PayPal wallet.
    Paypal,
    /// Direct card.
    CreditCard,
}

/// Payment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Created, awaiting payer approval.
    Created,
    /// Approved and executed.
    Approved,
    /// Failed.
    Failed,
    /// A state this version does not know.
    #[serde(other)]
    Unknown,
}

/// Payer details returned once the payer approves.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerInfo {
    /// E-mail.
    #[serde(default)]
    pub email: Option<Validated<String, (Length<0, 127>, EmailAddress)>>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<Text<0, 64>>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<Text<0, 64>>,
    /// PayPal-assigned id; pass it to execute.
    #[serde(default)]
    pub payer_id: Option<String>,
    /// Country code.
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Who pays, and how.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Funding instrument family.
    pub payment_method: PaymentMethod,
    /// `VERIFIED` or `UNVERIFIED`, response only.
    #[serde(default)]
    pub status: Option<String>,
    /// Payer details.
    #[serde(default)]
    pub payer_info: Option<PayerInfo>,
}

impl Payer {
    /// A PayPal-wallet payer.
    #[must_use]
    pub const fn paypal() -> Self {
        Self {
            payment_method: PaymentMethod::Paypal,
            status: None,
            payer_info: None,
        }
    }
}

/// A v1 line item.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name.
    pub name: Text<1, 127>,
    /// Number of units.
    pub quantity: NumericString,
    /// Price of one unit.
    #[serde_as(as = "DisplayFromStr")]
    pub price: Decimal,
    /// Currency of `price`.
    pub currency: CurrencyCodeField,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<Text<0, 127>>,
    /// Description.
    #[serde(default)]
    pub description: Option<Text<0, 127>>,
    /// Tax on one unit.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub tax: Option<Decimal>,
}

/// Items and shipping destination of a transaction.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemList {
    /// Items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Destination.
    #[serde(default)]
    pub shipping_address: Option<Address>,
}

/// One transaction within a payment.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount, with optional breakdown.
    pub amount: Amount,
    /// Description.
    #[serde(default)]
    pub description: Option<Text<0, 127>>,
    /// Caller's invoice number, unique per merchant.
    #[serde(default)]
    pub invoice_number: Option<Text<0, 127>>,
    /// Free-form merchant data.
    #[serde(default)]
    pub custom: Option<Text<0, 256>>,
    /// Text on the payer's card statement.
    #[serde(default)]
    pub soft_descriptor: Option<Text<0, 22>>,
    /// Items.
    #[serde(default)]
    pub item_list: Option<ItemList>,
}

impl Transaction {
    /// A transaction with only an amount.
    #[must_use]
    pub const fn new(amount: Amount) -> Self {
        Self {
            amount,
            description: None,
            invoice_number: None,
            custom: None,
            soft_descriptor: None,
            item_list: None,
        }
    }

    /// Sets the description.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `description` is over 127 characters.
    pub fn with_description(mut self, description: &str) -> Result<Self, ValidationError> {
        self.description = Some(Validated::new(description).map_err(|e| e.at("description"))?);
        Ok(self)
    }
}

/// Where PayPal sends the payer after approval or cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectUrls {
    /// After approval.
    pub return_url: String,
    /// After cancellation.
    pub cancel_url: String,
}

/// Body of `POST /v1/payments/payment`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// How the payment completes.
    pub intent: PaymentIntent,
    /// Who pays.
    pub payer: Payer,
    /// Transactions, at least one.
    pub transactions: Validated<Vec<Transaction>, Length<1, 100>>,
    /// Redirects; required for PayPal-wallet payments.
    #[serde(default)]
    pub redirect_urls: Option<RedirectUrls>,
    /// Note shown to the payer.
    #[serde(default)]
    pub note_to_payer: Option<Text<0, 165>>,
}

impl PaymentRequest {
    /// Creates a payment request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `transactions` is empty.
    pub fn new(
        intent: PaymentIntent,
        payer: Payer,
        transactions: Vec<Transaction>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            intent,
            payer,
            transactions: Validated::new(transactions).map_err(|e| e.at("transactions"))?,
            redirect_urls: None,
            note_to_payer: None,
        })
    }

    /// Sets the redirect URLs.
    #[must_use]
    pub fn with_redirect_urls(
        mut self,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        self.redirect_urls = Some(RedirectUrls {
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
        });
        self
    }
}

/// A payment resource.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: String,
    /// Intent.
    pub intent: PaymentIntent,
    /// State.
    pub state: PaymentState,
    /// Payer.
    #[serde(default)]
    pub payer: Option<Payer>,
    /// Transactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
    /// Why the payment failed, when `state` is `failed`.
    #[serde(default)]
    pub failure_reason: Option<String>,
    /// Created at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last updated at.
    #[serde(default, with = "iso8601_option")]
    pub update_time: Option<DateTime<Utc>>,
    /// Related links; `approval_url` is where the payer is sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// Body of `POST /v1/payments/payment/{id}/execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentExecution {
    /// Id of the approving payer, from the return URL.
    pub payer_id: String,
}

/// A page of payments.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentList {
    /// Payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Items on this page.
    #[serde(default)]
    pub count: Option<u32>,
    /// Id to pass as `start_id` for the next page.
    #[serde(default)]
    pub next_id: Option<String>,
}

/// How a recorded payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDetailMethod {
    /// Bank transfer.
    BankTransfer,
    /// Cash.
    Cash,
    /// Cheque.
    Check,
    /// Credit card.
    CreditCard,
    /// Debit card.
    DebitCard,
    /// PayPal.
    Paypal,
    /// Wire transfer.
    WireTransfer,
    /// Anything else.
    Other,
}

/// Where a recorded payment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDetailType {
    /// Through PayPal.
    Paypal,
    /// Recorded manually by the merchant.
    External,
}

/// A payment recorded against an invoice or agreement.
///
/// The amount shape differs between API families, so it is a parameter:
/// v1 invoicing uses [`Currency`], v2 invoicing uses
/// [`Money`](crate::amount::Money).
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: MonetaryAmount"))]
pub struct PaymentDetail<A = Currency> {
    /// PayPal or external.
    #[serde(default, rename = "type")]
    pub kind: Option<PaymentDetailType>,
    /// PayPal transaction id, for PayPal payments.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// `SALE`, `AUTHORIZATION` or `CAPTURE`.
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// When it was paid.
    #[serde(default)]
    pub date: Option<InvoiceDate>,
    /// Payment method.
    pub method: PaymentDetailMethod,
    /// Merchant's note.
    #[serde(default)]
    pub note: Option<Text<0, 4000>>,
    /// Amount paid; the full balance when absent.
    #[serde(default)]
    pub amount: Option<A>,
}

impl<A: MonetaryAmount> PaymentDetail<A> {
    /// An external payment of `amount` made with `method`.
    #[must_use]
    pub const fn external(method: PaymentDetailMethod, amount: A) -> Self {
        Self {
            kind: Some(PaymentDetailType::External),
            transaction_id: None,
            transaction_type: None,
            date: None,
            method,
            note: None,
            amount: Some(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Money;
    use serde_json::json;

    const APPROVAL_URL: &str = concat!(
        "https://www.sandbox.paypal.com/cgi-bin/webscr",
        "?cmd=_express-checkout&token=EC-60385559L1062554J",
    );

    #[test]
    fn test_payment_request_wire_shape() {
        let amount = Amount::new("USD", "30.11".parse().unwrap()).unwrap();
        let transaction = Transaction::new(amount)
            .with_description("The payment transaction description.")
            .unwrap();
        let request = PaymentRequest::new(PaymentIntent::Sale, Payer::paypal(), vec![transaction])
        .unwrap()
        .with_redirect_urls("https://example.com/return", "https://example.com/cancel");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "intent": "sale",
                "payer": {"payment_method": "paypal"},
                "transactions": [{
                    "amount": {"currency": "USD", "total": "30.11"},
                    "description": "The payment transaction description."
                }],
                "redirect_urls": {
                    "return_url": "https://example.com/return",
                    "cancel_url": "https://example.com/cancel"
                }
            })
        );
    }

    #[test]
    fn test_payment_request_needs_a_transaction() {
        let err =
            PaymentRequest::new(PaymentIntent::Sale, Payer::paypal(), Vec::new()).unwrap_err();
        assert_eq!(err.field(), Some("transactions"));
    }

    #[test]
    fn test_payment_decodes_response() {
        let payment: Payment = serde_json::from_value(json!({
            "id": "PAY-1B56960729604235TKQQIYVY",
            "intent": "sale",
            "state": "created",
            "payer": {"payment_method": "paypal"},
            "transactions": [{
                "amount": {
                    "currency": "USD",
                    "total": "30.11",
                    "details": {
                        "subtotal": "30.00",
                        "tax": "0.07",
                        "shipping": "0.03",
                        "handling_fee": "1.00",
                        "shipping_discount": "-1.00",
                        "insurance": "0.01"
                    }
                },
                "item_list": {"items": [{
                    "name": "hat",
                    "sku": "1",
                    "price": "3.00",
                    "currency": "USD",
                    "quantity": 5
                }]}
            }],
            "create_time": "2017-09-22T20:53:43Z",
            "links": [{
                "href": APPROVAL_URL,
                "rel": "approval_url",
                "method": "REDIRECT"
            }]
        }))
        .unwrap();
        assert_eq!(payment.state, PaymentState::Created);
        let details = payment.transactions[0].amount.details.as_ref().unwrap();
        assert_eq!(details.shipping_discount, Some("-1.00".parse().unwrap()));
        let items = &payment.transactions[0].item_list.as_ref().unwrap().items;
        assert_eq!(items[0].quantity, NumericString::from(5));
    }

    #[test]
    fn test_payment_detail_is_generic_over_amount() {
        let v1 = PaymentDetail::external(
            PaymentDetailMethod::Cash,
            Currency::from_parts("USD", "20.00".parse().unwrap()).unwrap(),
        );
        assert_eq!(
            serde_json::to_value(&v1).unwrap(),
            json!({
                "type": "EXTERNAL",
                "method": "CASH",
                "amount": {"currency": "USD", "value": "20.00"}
            })
        );
        let v2: PaymentDetail<Money> = serde_json::from_value(json!({
            "method": "BANK_TRANSFER",
            "date": "2018-05-01 PDT",
            "amount": {"currency_code": "EUR", "value": "5.00"}
        }))
        .unwrap();
        assert_eq!(v2.amount.unwrap().currency(), "EUR");
        assert_eq!(v2.date.unwrap().zone(), "PDT");
    }
}
