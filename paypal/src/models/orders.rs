//! v2 Checkout Orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::amount::{CurrencyCodeField, MonetaryAmount, Money, NumericString};
use crate::date::iso8601_option;
use crate::error::ValidationError;
use crate::models::common::{AddressPortable, Email, LinkDescription, Name, Phone};
use crate::validation::{Length, Text, Validated};

crate::pattern_rule! {
    /// PayPal-assigned account id: 13 characters, no `0`, `1`, `I` or `O`.
    pub PayerId = "[2-9A-HJ-NP-Z]{13}"
}

/// Whether the order captures immediately or authorizes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Capture payment immediately after the payer approves.
    Capture,
    /// Authorize now, capture later.
    Authorize,
}

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created with the given details.
    Created,
    /// Saved and persisted.
    Saved,
    /// Approved by the payer.
    Approved,
    /// All purchase units voided.
    Voided,
    /// Payment captured or authorized.
    Completed,
    /// Payer action (e.g. 3DS) pending.
    PayerActionRequired,
    /// A status this version does not know.
    #[serde(other)]
    Unknown,
}

/// Status of a capture or authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Authorized, not yet captured.
    Created,
    /// Captured.
    Captured,
    /// Funds are complete.
    Completed,
    /// Declined.
    Declined,
    /// Partially captured.
    PartiallyCaptured,
    /// Partially refunded.
    PartiallyRefunded,
    /// Pending review.
    Pending,
    /// Refunded.
    Refunded,
    /// Voided.
    Voided,
    /// Authorization expired.
    Expired,
    /// Denied.
    Denied,
    /// A status this version does not know.
    #[serde(other)]
    Unknown,
}

/// Breakdown of an order amount.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBreakdown {
    /// Sum of `unit_amount * quantity` over all items.
    #[serde(default)]
    pub item_total: Option<Money>,
    /// Shipping fee.
    #[serde(default)]
    pub shipping: Option<Money>,
    /// Handling fee.
    #[serde(default)]
    pub handling: Option<Money>,
    /// Sum of item taxes.
    #[serde(default)]
    pub tax_total: Option<Money>,
    /// Insurance fee.
    #[serde(default)]
    pub insurance: Option<Money>,
    /// Shipping discount.
    #[serde(default)]
    pub shipping_discount: Option<Money>,
    /// Order discount.
    #[serde(default)]
    pub discount: Option<Money>,
}

/// A v2 amount with an optional breakdown.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountWithBreakdown {
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCodeField,
    /// Total, string-encoded.
    #[serde_as(as = "DisplayFromStr")]
    pub value: Decimal,
    /// Components of the total.
    #[serde(default)]
    pub breakdown: Option<AmountBreakdown>,
}

impl AmountWithBreakdown {
    /// Creates an amount without a breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `currency` is not an ISO 4217 code.
    pub fn new(currency: &str, value: Decimal) -> Result<Self, ValidationError> {
        let money = Money::from_parts(currency, value)?;
        Ok(Self {
            currency_code: money.currency_code,
            value: money.value,
            breakdown: None,
        })
    }

    /// Attaches a breakdown.
    #[must_use]
    pub fn with_breakdown(mut self, breakdown: AmountBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }
}

/// Item category, which decides shipping requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    /// Downloadable goods.
    DigitalGoods,
    /// Shipped goods.
    PhysicalGoods,
    /// Donation.
    Donation,
}

/// A line item of a purchase unit.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name.
    pub name: Text<1, 127>,
    /// Price of one unit.
    pub unit_amount: Money,
    /// Tax on one unit.
    #[serde(default)]
    pub tax: Option<Money>,
    /// Number of units.
    pub quantity: NumericString,
    /// Detailed description.
    #[serde(default)]
    pub description: Option<Text<0, 127>>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<Text<0, 127>>,
    /// Category.
    #[serde(default)]
    pub category: Option<ItemCategory>,
}

/// The merchant receiving a purchase unit's payment.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    /// Merchant e-mail.
    #[serde(default)]
    pub email_address: Option<Email>,
    /// Merchant account id.
    #[serde(default)]
    pub merchant_id: Option<Validated<String, PayerId>>,
}

/// Where a purchase unit ships to.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetail {
    /// Recipient.
    #[serde(default)]
    pub name: Option<ShippingName>,
    /// Destination.
    #[serde(default)]
    pub address: Option<AddressPortable>,
}

/// Recipient of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingName {
    /// Recipient's full name.
    pub full_name: Text<1, 300>,
}

/// One purchase within an order request.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnitRequest {
    /// Caller's id for this unit; required when an order has several.
    #[serde(default)]
    pub reference_id: Option<Text<1, 256>>,
    /// Total amount.
    pub amount: AmountWithBreakdown,
    /// Receiving merchant, when not the API caller.
    #[serde(default)]
    pub payee: Option<Payee>,
    /// Purchase description.
    #[serde(default)]
    pub description: Option<Text<1, 127>>,
    /// Caller's id, echoed in reports.
    #[serde(default)]
    pub custom_id: Option<Text<1, 127>>,
    /// Caller's invoice number.
    #[serde(default)]
    pub invoice_id: Option<Text<1, 127>>,
    /// Text on the payer's card statement.
    #[serde(default)]
    pub soft_descriptor: Option<Text<1, 22>>,
    /// Line items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Shipping details.
    #[serde(default)]
    pub shipping: Option<ShippingDetail>,
}

impl PurchaseUnitRequest {
    /// A purchase unit with only an amount.
    #[must_use]
    pub const fn new(amount: AmountWithBreakdown) -> Self {
        Self {
            reference_id: None,
            amount,
            payee: None,
            description: None,
            custom_id: None,
            invoice_id: None,
            soft_descriptor: None,
            items: Vec::new(),
            shipping: None,
        }
    }

    /// Sets the reference id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `reference_id` is empty or over 256 characters.
    pub fn with_reference_id(mut self, reference_id: &str) -> Result<Self, ValidationError> {
        self.reference_id = Some(Validated::new(reference_id).map_err(|e| e.at("reference_id"))?);
        Ok(self)
    }

    /// Sets the description.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `description` is empty or over 127 characters.
    pub fn with_description(mut self, description: &str) -> Result<Self, ValidationError> {
        self.description = Some(Validated::new(description).map_err(|e| e.at("description"))?);
        Ok(self)
    }
}

/// The payer, v2 shape.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Payer's name.
    #[serde(default)]
    pub name: Option<Name>,
    /// Payer's e-mail.
    #[serde(default)]
    pub email_address: Option<Email>,
    /// PayPal account id.
    #[serde(default)]
    pub payer_id: Option<Validated<String, PayerId>>,
    /// Payer's phone.
    #[serde(default)]
    pub phone: Option<PhoneWithType>,
    /// Payer's address.
    #[serde(default)]
    pub address: Option<AddressPortable>,
}

/// A phone number with its usage type.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneWithType {
    /// `HOME`, `MOBILE`, ...
    #[serde(default)]
    pub phone_type: Option<String>,
    /// The number.
    pub phone_number: PhoneNumber,
}

/// National number only, as v2 orders send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Digits.
    pub national_number: Validated<String, crate::validation::NationalNumber>,
}

impl From<Phone> for PhoneNumber {
    fn from(phone: Phone) -> Self {
        Self {
            national_number: phone.national_number,
        }
    }
}

/// Landing page shown to the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandingPage {
    /// PayPal login.
    Login,
    /// Guest checkout with card fields.
    Billing,
    /// PayPal decides.
    NoPreference,
}

/// Where the shipping address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
    /// From the payer's PayPal profile.
    GetFromFile,
    /// Nothing ships.
    NoShipping,
    /// The merchant's address is used as is.
    SetProvidedAddress,
}

/// Label of the final button on the approval page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    /// "Continue": the merchant confirms later.
    Continue,
    /// "Pay Now": capture follows immediately.
    PayNow,
}

/// Customizes the payer's approval experience.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    /// Overrides the business name shown to the payer.
    #[serde(default)]
    pub brand_name: Option<Text<1, 127>>,
    /// Page locale, e.g. `en-US`.
    #[serde(default)]
    pub locale: Option<Text<2, 10>>,
    /// Landing page.
    #[serde(default)]
    pub landing_page: Option<LandingPage>,
    /// Shipping address source.
    #[serde(default)]
    pub shipping_preference: Option<ShippingPreference>,
    /// Final button label.
    #[serde(default)]
    pub user_action: Option<UserAction>,
    /// Where the payer goes after approving.
    #[serde(default)]
    pub return_url: Option<String>,
    /// Where the payer goes after cancelling.
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Body of `POST /v2/checkout/orders`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Capture or authorize.
    pub intent: Intent,
    /// Payer, when already known.
    #[serde(default)]
    pub payer: Option<Payer>,
    /// Between one and ten purchase units.
    pub purchase_units: Validated<Vec<PurchaseUnitRequest>, Length<1, 10>>,
    /// Approval page customization.
    #[serde(default)]
    pub application_context: Option<ApplicationContext>,
}

impl OrderRequest {
    /// Creates an order request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] unless there are 1 to 10 purchase units.
    pub fn new(
        intent: Intent,
        purchase_units: Vec<PurchaseUnitRequest>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            intent,
            payer: None,
            purchase_units: Validated::new(purchase_units).map_err(|e| e.at("purchase_units"))?,
            application_context: None,
        })
    }

    /// Sets the application context.
    #[must_use]
    pub fn with_application_context(mut self, context: ApplicationContext) -> Self {
        self.application_context = Some(context);
        self
    }
}

/// A capture of an order payment.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Capture id.
    pub id: String,
    /// Status.
    pub status: PaymentStatus,
    /// Captured amount.
    #[serde(default)]
    pub amount: Option<Money>,
    /// Whether no further captures are allowed.
    #[serde(default)]
    pub final_capture: Option<bool>,
    /// Created at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last updated at.
    #[serde(default, with = "iso8601_option")]
    pub update_time: Option<DateTime<Utc>>,
    /// Related links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// An authorization of an order payment.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Authorization id.
    pub id: String,
    /// Status.
    pub status: PaymentStatus,
    /// Authorized amount.
    #[serde(default)]
    pub amount: Option<Money>,
    /// When the authorization lapses.
    #[serde(default, with = "iso8601_option")]
    pub expiration_time: Option<DateTime<Utc>>,
    /// Created at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Related links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// Captures and authorizations made against a purchase unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCollection {
    /// Captures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
    /// Authorizations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorizations: Vec<Authorization>,
}

/// A purchase unit as PayPal returns it.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    /// Reference id.
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Amount.
    #[serde(default)]
    pub amount: Option<AmountWithBreakdown>,
    /// Receiving merchant.
    #[serde(default)]
    pub payee: Option<Payee>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Caller's id.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Caller's invoice number.
    #[serde(default)]
    pub invoice_id: Option<String>,
    /// Line items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Shipping details.
    #[serde(default)]
    pub shipping: Option<ShippingDetail>,
    /// Payments made so far.
    #[serde(default)]
    pub payments: Option<PaymentCollection>,
}

/// An order.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: String,
    /// Status.
    pub status: OrderStatus,
    /// Intent, echoed back.
    #[serde(default)]
    pub intent: Option<Intent>,
    /// Payer, once approved.
    #[serde(default)]
    pub payer: Option<Payer>,
    /// Purchase units.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub purchase_units: Vec<PurchaseUnit>,
    /// Created at.
    #[serde(default, with = "iso8601_option")]
    pub create_time: Option<DateTime<Utc>>,
    /// Last updated at.
    #[serde(default, with = "iso8601_option")]
    pub update_time: Option<DateTime<Utc>>,
    /// Related links; `approve` is where the payer is sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

impl Order {
    /// Returns the payer approval URL, if PayPal supplied one.
    #[must_use]
    pub fn approve_url(&self) -> Option<&str> {
        crate::models::common::find_link(&self.links, "approve").map(|link| link.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(value: &str) -> PurchaseUnitRequest {
        PurchaseUnitRequest::new(AmountWithBreakdown::new("USD", value.parse().unwrap()).unwrap())
    }

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest::new(
            Intent::Capture,
            vec![unit("100.00").with_reference_id("default").unwrap()],
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "reference_id": "default",
                    "amount": {"currency_code": "USD", "value": "100.00"}
                }]
            })
        );
    }

    #[test]
    fn test_order_request_needs_purchase_units() {
        let err = OrderRequest::new(Intent::Authorize, Vec::new()).unwrap_err();
        assert_eq!(err.field(), Some("purchase_units"));
        assert_eq!(err.identifier(), "invalidLength");
        let eleven = (0..11).map(|_| unit("1.00")).collect();
        assert!(OrderRequest::new(Intent::Capture, eleven).is_err());
    }

    #[test]
    fn test_soft_descriptor_limit() {
        let mut unit = unit("1.00");
        unit.soft_descriptor = Some(Validated::new("x".repeat(22)).unwrap());
        assert!(Text::<1, 22>::new("x".repeat(23)).is_err());
        assert!(serde_json::to_value(&unit).unwrap()["soft_descriptor"].is_string());
    }

    #[test]
    fn test_payer_email_validated_on_decode() {
        let payer: Payer = serde_json::from_value(json!({
            "name": {"given_name": "John", "surname": "Doe"},
            "email_address": "buyer@example.com",
            "payer_id": "QYR5Z8XDVJNXQ"
        }))
        .unwrap();
        assert_eq!(payer.email_address.as_deref().map(String::as_str), Some("buyer@example.com"));
        assert!(serde_json::from_value::<Payer>(json!({"email_address": "nobody"})).is_err());
        assert!(serde_json::from_value::<Payer>(json!({"payer_id": "QYR5Z8XDVJNX0"})).is_err());
    }

    #[test]
    fn test_order_decodes_response() {
        let order: Order = serde_json::from_value(json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": "d9f80740-38f0-11e8-b467-0ed5f89f718b",
                "amount": {"currency_code": "USD", "value": "100.00"},
                "payments": {"captures": [{
                    "id": "3C679366HH908993F",
                    "status": "COMPLETED",
                    "amount": {"currency_code": "USD", "value": "100.00"},
                    "final_capture": true,
                    "create_time": "2018-04-01T21:20:49Z"
                }]}
            }],
            "create_time": "2018-04-01T21:18:49Z",
            "links": [{
                "href": "https://www.paypal.com/checkoutnow?token=5O190127TN364715T",
                "rel": "approve",
                "method": "GET"
            }]
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        let captures = &order.purchase_units[0].payments.as_ref().unwrap().captures;
        assert_eq!(captures[0].status, PaymentStatus::Completed);
        assert_eq!(
            order.approve_url(),
            Some("https://www.paypal.com/checkoutnow?token=5O190127TN364715T")
        );
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let order: Order =
            serde_json::from_value(json!({"id": "X", "status": "SOMETHING_NEW"})).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);
    }
}
