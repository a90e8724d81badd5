//! v1 Invoicing.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::amount::{Cost, Currency, NumericString};
use crate::date::InvoiceDate;
use crate::error::ValidationError;
use crate::models::common::{Address, LinkDescription, Metadata, Phone};
use crate::models::payments::PaymentDetail;
use crate::validation::{EmailAddress, Length, Text, Validated};

/// E-mail field as invoicing bounds it, up to 260 characters.
pub type InvoiceEmail = Validated<String, (Length<3, 260>, EmailAddress)>;

/// Invoice lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Not yet sent.
    Draft,
    /// Sent to the payer.
    Sent,
    /// Paid through PayPal.
    Paid,
    /// Marked paid by the merchant.
    MarkedAsPaid,
    /// Cancelled.
    Cancelled,
    /// Refunded through PayPal.
    Refunded,
    /// Partially refunded.
    PartiallyRefunded,
    /// Marked refunded by the merchant.
    MarkedAsRefunded,
    /// Past due.
    Unpaid,
    /// Payment in progress.
    PaymentPending,
    /// Partially paid.
    PartiallyPaid,
    /// Scheduled for a future send.
    Scheduled,
    /// A status this version does not know.
    #[serde(other)]
    Unknown,
}

/// The merchant issuing the invoice.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantInfo {
    /// Merchant e-mail; must be the caller's PayPal account.
    pub email: InvoiceEmail,
    /// First name.
    #[serde(default)]
    pub first_name: Option<Text<0, 256>>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<Text<0, 256>>,
    /// Address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Business name.
    #[serde(default)]
    pub business_name: Option<Text<0, 100>>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<Phone>,
    /// Fax.
    #[serde(default)]
    pub fax: Option<Phone>,
    /// Website.
    #[serde(default)]
    pub website: Option<Text<0, 2048>>,
    /// Tax id.
    #[serde(default)]
    pub tax_id: Option<Text<0, 100>>,
    /// Free-form extra line.
    #[serde(default)]
    pub additional_info: Option<Text<0, 40>>,
}

impl MerchantInfo {
    /// Creates merchant info from an e-mail.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `email` is not a valid address.
    pub fn new(email: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Validated::new(email).map_err(|e| e.at("email"))?,
            first_name: None,
            last_name: None,
            address: None,
            business_name: None,
            phone: None,
            fax: None,
            website: None,
            tax_id: None,
            additional_info: None,
        })
    }

    /// Sets the business name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `name` is over 100 characters.
    pub fn with_business_name(mut self, name: &str) -> Result<Self, ValidationError> {
        self.business_name = Some(Validated::new(name).map_err(|e| e.at("business_name"))?);
        Ok(self)
    }
}

/// A recipient of the invoice.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    /// Payer e-mail.
    #[serde(default)]
    pub email: Option<InvoiceEmail>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<Text<0, 30>>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<Text<0, 30>>,
    /// Business name.
    #[serde(default)]
    pub business_name: Option<Text<0, 100>>,
    /// Address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Language of the e-mail PayPal sends, e.g. `en_US`.
    #[serde(default)]
    pub language: Option<Text<2, 11>>,
    /// Free-form extra line.
    #[serde(default)]
    pub additional_info: Option<Text<0, 40>>,
}

impl BillingInfo {
    /// Billing info for an e-mail recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `email` is not a valid address.
    pub fn email(email: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Some(Validated::new(email).map_err(|e| e.at("email"))?),
            ..Self::default()
        })
    }
}

/// Where the goods ship.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    /// First name.
    #[serde(default)]
    pub first_name: Option<Text<0, 256>>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<Text<0, 256>>,
    /// Business name.
    #[serde(default)]
    pub business_name: Option<Text<0, 480>>,
    /// Address.
    #[serde(default)]
    pub address: Option<Address>,
}

/// A tax applied to an item or to shipping.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Tax id, response only.
    #[serde(default)]
    pub id: Option<String>,
    /// Tax name.
    pub name: Text<1, 100>,
    /// Rate, 0 to 100.
    pub percent: NumericString,
    /// Computed amount, response only.
    #[serde(default)]
    pub amount: Option<Currency>,
}

/// Unit of measure for item quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOfMeasure {
    /// Counted items.
    Quantity,
    /// Hours of work.
    Hours,
    /// Flat amount.
    Amount,
}

/// An invoice line item.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item name.
    pub name: Text<1, 200>,
    /// Description.
    #[serde(default)]
    pub description: Option<Text<0, 1000>>,
    /// Number of units; PayPal echoes numbers or strings.
    pub quantity: NumericString,
    /// Price of one unit.
    pub unit_price: Currency,
    /// Tax on the item.
    #[serde(default)]
    pub tax: Option<Tax>,
    /// Date the item was provided.
    #[serde(default)]
    pub date: Option<InvoiceDate>,
    /// Discount, as percent or fixed amount.
    #[serde(default)]
    pub discount: Option<Cost>,
    /// Unit of measure.
    #[serde(default)]
    pub unit_of_measure: Option<UnitOfMeasure>,
}

impl InvoiceItem {
    /// Creates an item.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `name` is empty or over 200 characters.
    pub fn new(
        name: &str,
        quantity: impl Into<NumericString>,
        unit_price: Currency,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: Validated::new(name).map_err(|e| e.at("name"))?,
            description: None,
            quantity: quantity.into(),
            unit_price,
            tax: None,
            date: None,
            discount: None,
            unit_of_measure: None,
        })
    }
}

/// When payment is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentTermType {
    /// On receipt.
    DueOnReceipt,
    /// On a fixed date.
    DueOnDateSpecified,
    /// Within 10 days.
    #[serde(rename = "NET_10")]
    Net10,
    /// Within 15 days.
    #[serde(rename = "NET_15")]
    Net15,
    /// Within 30 days.
    #[serde(rename = "NET_30")]
    Net30,
    /// Within 45 days.
    #[serde(rename = "NET_45")]
    Net45,
    /// Within 60 days.
    #[serde(rename = "NET_60")]
    Net60,
    /// Within 90 days.
    #[serde(rename = "NET_90")]
    Net90,
    /// No term.
    NoDueDate,
}

/// Payment term: a term type or an explicit due date.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerm {
    /// Term type.
    #[serde(default)]
    pub term_type: Option<PaymentTermType>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<InvoiceDate>,
}

/// Shipping charged on the invoice.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingCost {
    /// Amount.
    #[serde(default)]
    pub amount: Option<Currency>,
    /// Tax on shipping.
    #[serde(default)]
    pub tax: Option<Tax>,
}

/// A labelled adjustment to the invoice total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAmount {
    /// Label shown on the invoice.
    pub label: Text<0, 50>,
    /// Adjustment, which may be negative.
    pub amount: Currency,
}

/// An invoice.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice id, assigned by PayPal.
    #[serde(default)]
    pub id: Option<String>,
    /// Invoice number; PayPal generates one when absent.
    #[serde(default)]
    pub number: Option<Text<0, 25>>,
    /// Template the invoice was created from.
    #[serde(default)]
    pub template_id: Option<String>,
    /// Status, response only.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Issuing merchant.
    pub merchant_info: MerchantInfo,
    /// Recipients; at most 100.
    #[serde(default, skip_serializing_if = "is_empty_list")]
    pub billing_info: Validated<Vec<BillingInfo>, Length<0, 100>>,
    /// Carbon-copy recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_info: Vec<BillingInfo>,
    /// Shipping recipient.
    #[serde(default)]
    pub shipping_info: Option<ShippingInfo>,
    /// Items; at most 100.
    #[serde(default, skip_serializing_if = "is_empty_list")]
    pub items: Validated<Vec<InvoiceItem>, Length<0, 100>>,
    /// Issue date.
    #[serde(default)]
    pub invoice_date: Option<InvoiceDate>,
    /// Due terms.
    #[serde(default)]
    pub payment_term: Option<PaymentTerm>,
    /// Reference data, such as a PO number.
    #[serde(default)]
    pub reference: Option<Text<0, 60>>,
    /// Invoice-level discount.
    #[serde(default)]
    pub discount: Option<Cost>,
    /// Shipping.
    #[serde(default)]
    pub shipping_cost: Option<ShippingCost>,
    /// Custom adjustment.
    #[serde(default)]
    pub custom: Option<CustomAmount>,
    /// Whether partial payments are accepted.
    #[serde(default)]
    pub allow_partial_payment: Option<bool>,
    /// Minimum accepted partial payment.
    #[serde(default)]
    pub minimum_amount_due: Option<Currency>,
    /// Whether tax is computed after discounts.
    #[serde(default)]
    pub tax_calculated_after_discount: Option<bool>,
    /// Whether unit prices include tax.
    #[serde(default)]
    pub tax_inclusive: Option<bool>,
    /// General terms.
    #[serde(default)]
    pub terms: Option<Text<0, 4000>>,
    /// Note to the payer.
    #[serde(default)]
    pub note: Option<Text<0, 4000>>,
    /// Private note, visible to the merchant only.
    #[serde(default)]
    pub merchant_memo: Option<Text<0, 500>>,
    /// Logo URL; HTTPS, at most 250x90 pixels.
    #[serde(default)]
    pub logo_url: Option<Text<0, 4000>>,
    /// Total, response only.
    #[serde(default)]
    pub total_amount: Option<Currency>,
    /// Payments recorded so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<PaymentDetail<Currency>>,
    /// Audit fields.
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Related links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

impl Invoice {
    /// A draft invoice from `merchant_info` with nothing else set.
    #[must_use]
    pub fn new(merchant_info: MerchantInfo) -> Self {
        Self {
            id: None,
            number: None,
            template_id: None,
            status: None,
            merchant_info,
            billing_info: Validated::default(),
            cc_info: Vec::new(),
            shipping_info: None,
            items: Validated::default(),
            invoice_date: None,
            payment_term: None,
            reference: None,
            discount: None,
            shipping_cost: None,
            custom: None,
            allow_partial_payment: None,
            minimum_amount_due: None,
            tax_calculated_after_discount: None,
            tax_inclusive: None,
            terms: None,
            note: None,
            merchant_memo: None,
            logo_url: None,
            total_amount: None,
            payments: Vec::new(),
            metadata: None,
            links: Vec::new(),
        }
    }

    /// Adds a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the invoice already has 100 recipients.
    pub fn with_billing_info(mut self, billing: BillingInfo) -> Result<Self, ValidationError> {
        let mut recipients = self.billing_info.into_inner();
        recipients.push(billing);
        self.billing_info = Validated::new(recipients).map_err(|e| e.at("billing_info"))?;
        Ok(self)
    }

    /// Adds a line item.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the invoice already has 100 items.
    pub fn with_item(mut self, item: InvoiceItem) -> Result<Self, ValidationError> {
        let mut items = self.items.into_inner();
        items.push(item);
        self.items = Validated::new(items).map_err(|e| e.at("items"))?;
        Ok(self)
    }

    /// Sets the note to the payer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `note` is over 4000 characters.
    pub fn with_note(mut self, note: &str) -> Result<Self, ValidationError> {
        self.note = Some(Validated::new(note).map_err(|e| e.at("note"))?);
        Ok(self)
    }
}

fn is_empty_list<T, R>(list: &Validated<Vec<T>, R>) -> bool {
    list.is_empty()
}

/// A page of invoices.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    /// Invoices.
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    /// Total across pages, when `total_count_required` was set.
    #[serde(default)]
    pub total_count: Option<u32>,
    /// Pagination links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// Response of `POST /v1/invoicing/invoices/next-invoice-number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber {
    /// The next number PayPal would assign.
    pub number: String,
}

/// Body of the remind and cancel endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// E-mail subject.
    #[serde(default)]
    pub subject: Option<Text<0, 4000>>,
    /// E-mail note.
    #[serde(default)]
    pub note: Option<Text<0, 4000>>,
    /// Also e-mail the merchant.
    #[serde(default)]
    pub send_to_merchant: Option<bool>,
    /// Also e-mail the payer; cancel only.
    #[serde(default)]
    pub send_to_payer: Option<bool>,
    /// Extra recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_emails: Vec<InvoiceEmail>,
}

impl Notification {
    /// A notification carrying a subject and note.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either exceeds 4000 characters.
    pub fn new(subject: &str, note: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            subject: Some(Validated::new(subject).map_err(|e| e.at("subject"))?),
            note: Some(Validated::new(note).map_err(|e| e.at("note"))?),
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::MonetaryAmount;
    use serde_json::json;

    fn usd(value: &str) -> Currency {
        Currency::from_parts("USD", value.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_invoice_wire_shape() {
        let invoice = Invoice::new(
            MerchantInfo::new("merchant@example.com")
                .unwrap()
                .with_business_name("Medical Professionals, LLC")
                .unwrap(),
        )
        .with_billing_info(BillingInfo::email("bill-me@example.com").unwrap())
        .unwrap()
        .with_item(InvoiceItem::new("Sutures", 100_u32, usd("5")).unwrap())
        .unwrap()
        .with_note("Medical Invoice 16 Jul, 2013 PST")
        .unwrap();
        assert_eq!(
            serde_json::to_value(&invoice).unwrap(),
            json!({
                "merchant_info": {
                    "email": "merchant@example.com",
                    "business_name": "Medical Professionals, LLC"
                },
                "billing_info": [{"email": "bill-me@example.com"}],
                "items": [{
                    "name": "Sutures",
                    "quantity": "100",
                    "unit_price": {"currency": "USD", "value": "5"}
                }],
                "note": "Medical Invoice 16 Jul, 2013 PST"
            })
        );
    }

    #[test]
    fn test_invoice_field_limits() {
        let mut invoice = Invoice::new(MerchantInfo::new("m@example.com").unwrap());
        assert!(invoice.with_note(&"n".repeat(4000)).is_ok());
        invoice = Invoice::new(MerchantInfo::new("m@example.com").unwrap());
        let err = invoice.with_note(&"n".repeat(4001)).unwrap_err();
        assert_eq!(err.field(), Some("note"));
        assert!(Text::<0, 25>::new("INV-".repeat(7)).is_err());
        assert!(Text::<0, 500>::new("m".repeat(500)).is_ok());
    }

    #[test]
    fn test_invoice_decodes_response() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "INV2-EHNV-LJ5S-A7DZ-V6NJ",
            "number": "0001",
            "status": "SENT",
            "merchant_info": {
                "email": "merchant@example.com",
                "address": {
                    "line1": "1234 Main St.",
                    "city": "Portland",
                    "state": "OR",
                    "postal_code": "97217",
                    "country_code": "US"
                }
            },
            "billing_info": [{"email": "example@example.com"}],
            "items": [{
                "name": "Sutures",
                "quantity": 100.0,
                "unit_price": {"currency": "USD", "value": "5.00"},
                "discount": {"percent": "10"}
            }],
            "invoice_date": "2014-03-24 PDT",
            "payment_term": {"term_type": "NET_45", "due_date": "2014-05-08 PDT"},
            "discount": {"amount": {"currency": "USD", "value": "2.50"}},
            "total_amount": {"currency": "USD", "value": "500.00"},
            "payments": [{
                "type": "EXTERNAL",
                "method": "CASH",
                "date": "2014-03-25 PDT",
                "amount": {"currency": "USD", "value": "20.00"}
            }],
            "metadata": {"created_date": "2014-03-24 12:11:52 PDT"}
        }))
        .unwrap();
        assert_eq!(invoice.status, Some(InvoiceStatus::Sent));
        assert_eq!(invoice.items[0].discount, Some(Cost::Percent(NumericString::from(10))));
        assert!(matches!(invoice.discount, Some(Cost::Amount(_))));
        assert_eq!(
            invoice.payment_term.as_ref().and_then(|t| t.term_type),
            Some(PaymentTermType::Net45)
        );
        assert_eq!(invoice.payments.len(), 1);
    }

    #[test]
    fn test_invoice_decode_rejects_long_memo() {
        let body = json!({
            "merchant_info": {"email": "merchant@example.com"},
            "merchant_memo": "m".repeat(501)
        });
        let err = serde_json::from_value::<Invoice>(body).unwrap_err();
        assert!(err.to_string().contains("invalidLength"));
    }

    #[test]
    fn test_item_rejects_malformed_discount() {
        let body = json!({
            "name": "x",
            "quantity": 1,
            "unit_price": {"currency": "USD", "value": "1"},
            "discount": {}
        });
        let err = serde_json::from_value::<InvoiceItem>(body).unwrap_err();
        assert!(err.to_string().contains("badType"));
    }

    #[test]
    fn test_notification_shape() {
        let notification = Notification::new("Past due", "Please pay soon").unwrap();
        assert_eq!(
            serde_json::to_value(&notification).unwrap(),
            json!({"subject": "Past due", "note": "Please pay soon"})
        );
    }
}
