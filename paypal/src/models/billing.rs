//! v1 Billing plans and agreements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::amount::{Currency, MonetaryAmount};
use crate::date::{iso8601, iso8601_option};
use crate::error::{ValidationError, ValidationErrorKind};
use crate::models::common::{Address, LinkDescription, Patch};
use crate::models::payments::Payer;
use crate::validation::{Text, Validated};

/// Body of the PATCH endpoints: a list of JSON Patch operations.
pub type PatchRequest = Vec<Patch>;

/// Whether a plan has a fixed number of cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    /// A fixed number of cycles.
    Fixed,
    /// Until cancelled.
    Infinite,
}

/// Plan lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanState {
    /// Created, not yet usable.
    Created,
    /// Agreements may be created from it.
    Active,
    /// No new agreements.
    Inactive,
    /// Deleted.
    Deleted,
    /// A state this version does not know.
    #[serde(other)]
    Unknown,
}

/// Trial or regular billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDefinitionType {
    /// Trial period.
    Trial,
    /// Regular period.
    Regular,
}

/// Billing frequency unit.
///
/// Responses sometimes echo the unit capitalized (`Month`); both forms decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    /// Daily.
    #[serde(alias = "Day")]
    Day,
    /// Weekly.
    #[serde(alias = "Week")]
    Week,
    /// Monthly.
    #[serde(alias = "Month")]
    Month,
    /// Yearly.
    #[serde(alias = "Year")]
    Year,
}

/// Shipping or tax charge added to a payment definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeModelType {
    /// Shipping.
    Shipping,
    /// Tax.
    Tax,
}

/// An extra charge on each cycle.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeModel {
    /// Charge id, response only.
    #[serde(default)]
    pub id: Option<String>,
    /// Shipping or tax.
    #[serde(rename = "type")]
    pub kind: ChargeModelType,
    /// Amount per cycle.
    pub amount: Currency,
}

/// Checks a frequency/interval pair: 1 to 12 units per cycle, and at most
/// one year.
///
/// # Errors
///
/// Returns an `invalidFrequency` [`ValidationError`] otherwise.
pub fn check_frequency(frequency: Frequency, interval: u8) -> Result<(), ValidationError> {
    let max = if frequency == Frequency::Year { 1 } else { 12 };
    if (1..=max).contains(&interval) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidFrequency,
            format!(
                "frequency_interval for {frequency:?} must be between 1 and {max}, got {interval}"
            ),
        ))
    }
}

/// One billing period of a plan: trial or regular.
///
/// The frequency and its interval are only set together, so the pair is
/// checked on construction, on [`PaymentDefinition::set_frequency`], and on
/// decode.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaymentDefinitionWire")]
pub struct PaymentDefinition {
    /// Definition id, response only.
    pub id: Option<String>,
    /// Name.
    pub name: Text<1, 128>,
    /// Trial or regular.
    #[serde(rename = "type")]
    pub kind: PaymentDefinitionType,
    frequency: Frequency,
    #[serde_as(as = "DisplayFromStr")]
    frequency_interval: u8,
    /// Number of cycles; `0` means until cancelled.
    #[serde_as(as = "DisplayFromStr")]
    pub cycles: u32,
    /// Amount per cycle.
    pub amount: Currency,
    /// Extra charges per cycle.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charge_models: Vec<ChargeModel>,
}

#[serde_as]
#[derive(Deserialize)]
struct PaymentDefinitionWire {
    #[serde(default)]
    id: Option<String>,
    name: Text<1, 128>,
    #[serde(rename = "type")]
    kind: PaymentDefinitionType,
    frequency: Frequency,
    #[serde_as(as = "DisplayFromStr")]
    frequency_interval: u8,
    #[serde_as(as = "DisplayFromStr")]
    cycles: u32,
    amount: Currency,
    #[serde(default)]
    charge_models: Vec<ChargeModel>,
}

impl TryFrom<PaymentDefinitionWire> for PaymentDefinition {
    type Error = ValidationError;

    fn try_from(wire: PaymentDefinitionWire) -> Result<Self, Self::Error> {
        check_frequency(wire.frequency, wire.frequency_interval)
            .map_err(|e| e.at("frequency_interval"))?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            kind: wire.kind,
            frequency: wire.frequency,
            frequency_interval: wire.frequency_interval,
            cycles: wire.cycles,
            amount: wire.amount,
            charge_models: wire.charge_models,
        })
    }
}

impl PaymentDefinition {
    /// Creates a payment definition.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `name` is empty or over 128 characters,
    /// or `invalidFrequency` if the interval does not fit the frequency.
    pub fn new(
        name: &str,
        kind: PaymentDefinitionType,
        frequency: Frequency,
        frequency_interval: u8,
        cycles: u32,
        amount: Currency,
    ) -> Result<Self, ValidationError> {
        check_frequency(frequency, frequency_interval).map_err(|e| e.at("frequency_interval"))?;
        Ok(Self {
            id: None,
            name: Validated::new(name).map_err(|e| e.at("name"))?,
            kind,
            frequency,
            frequency_interval,
            cycles,
            amount,
            charge_models: Vec::new(),
        })
    }

    /// Returns the frequency unit.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns how many units make one cycle.
    #[must_use]
    pub const fn frequency_interval(&self) -> u8 {
        self.frequency_interval
    }

    /// Replaces the frequency and interval together.
    ///
    /// # Errors
    ///
    /// Returns `invalidFrequency` and leaves both unchanged if the pair is
    /// rejected.
    pub fn set_frequency(
        &mut self,
        frequency: Frequency,
        interval: u8,
    ) -> Result<(), ValidationError> {
        check_frequency(frequency, interval).map_err(|e| e.at("frequency_interval"))?;
        self.frequency = frequency;
        self.frequency_interval = interval;
        Ok(())
    }

    /// Adds a charge model.
    #[must_use]
    pub fn with_charge_model(mut self, charge: ChargeModel) -> Self {
        self.charge_models.push(charge);
        self
    }
}

/// `YES` or `NO` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YesNo {
    /// `YES`.
    Yes,
    /// `NO`.
    No,
}

/// What happens when the setup fee fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailAction {
    /// Keep the agreement active.
    Continue,
    /// Cancel the agreement.
    Cancel,
}

/// Merchant-side settings of a plan or agreement.
///
/// Generic over the amount shape of `setup_fee`, so the same model serves
/// v1 plans ([`Currency`]) and their v2 counterparts
/// ([`Money`](crate::amount::Money)).
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "A: MonetaryAmount"))]
pub struct MerchantPreferences<A = Currency> {
    /// Preferences id, response only.
    #[serde(default)]
    pub id: Option<String>,
    /// Fee charged when the agreement starts.
    #[serde(default)]
    pub setup_fee: Option<A>,
    /// Where the payer goes after cancelling.
    pub cancel_url: Text<1, 1000>,
    /// Where the payer goes after approving.
    pub return_url: Text<1, 1000>,
    /// Webhook-style notification URL.
    #[serde(default)]
    pub notify_url: Option<Text<1, 1000>>,
    /// Failed attempts before cancellation; `0` means unlimited.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub max_fail_attempts: Option<u32>,
    /// Whether an outstanding balance is billed in the next cycle.
    #[serde(default)]
    pub auto_bill_amount: Option<YesNo>,
    /// Action when the setup fee fails.
    #[serde(default)]
    pub initial_fail_amount_action: Option<FailAction>,
    /// Accepted payment type.
    #[serde(default)]
    pub accepted_payment_type: Option<String>,
    /// Character set for the payer-facing pages.
    #[serde(default)]
    pub char_set: Option<String>,
}

impl<A: MonetaryAmount> MerchantPreferences<A> {
    /// Preferences with only the redirect URLs set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either URL is empty or over 1000 characters.
    pub fn new(return_url: &str, cancel_url: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            setup_fee: None,
            cancel_url: Validated::new(cancel_url).map_err(|e| e.at("cancel_url"))?,
            return_url: Validated::new(return_url).map_err(|e| e.at("return_url"))?,
            notify_url: None,
            max_fail_attempts: None,
            auto_bill_amount: None,
            initial_fail_amount_action: None,
            accepted_payment_type: None,
            char_set: None,
        })
    }

    /// Sets the setup fee.
    #[must_use]
    pub fn with_setup_fee(mut self, fee: A) -> Self {
        self.setup_fee = Some(fee);
        self
    }
}

/// A billing plan.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPlan {
    /// Plan id, response only.
    #[serde(default)]
    pub id: Option<String>,
    /// Name.
    pub name: Text<1, 128>,
    /// Description.
    pub description: Text<1, 127>,
    /// Fixed or infinite.
    #[serde(rename = "type")]
    pub kind: PlanType,
    /// State, response only.
    #[serde(default)]
    pub state: Option<PlanState>,
    /// Billing periods.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_definitions: Vec<PaymentDefinition>,
    /// Merchant settings.
    #[serde(default)]
    pub merchant_preferences: Option<MerchantPreferences>,
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

impl BillingPlan {
    /// Creates a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `name` is over 128 characters or
    /// `description` over 127.
    pub fn new(name: &str, description: &str, kind: PlanType) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            name: Validated::new(name).map_err(|e| e.at("name"))?,
            description: Validated::new(description).map_err(|e| e.at("description"))?,
            kind,
            state: None,
            payment_definitions: Vec::new(),
            merchant_preferences: None,
            create_time: None,
            update_time: None,
            links: Vec::new(),
        })
    }

    /// Adds a billing period.
    #[must_use]
    pub fn with_payment_definition(mut self, definition: PaymentDefinition) -> Self {
        self.payment_definitions.push(definition);
        self
    }

    /// Sets the merchant preferences.
    #[must_use]
    pub fn with_merchant_preferences(mut self, preferences: MerchantPreferences) -> Self {
        self.merchant_preferences = Some(preferences);
        self
    }
}

/// Patch that moves a plan to `ACTIVE`.
#[must_use]
pub fn activate_patch() -> PatchRequest {
    vec![Patch::replace("/", serde_json::json!({ "state": "ACTIVE" }))]
}

/// A page of plans.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanList {
    /// Plans.
    #[serde(default)]
    pub plans: Vec<BillingPlan>,
    /// Total plans, string-encoded.
    #[serde(default)]
    pub total_items: Option<String>,
    /// Total pages, string-encoded.
    #[serde(default)]
    pub total_pages: Option<String>,
    /// Pagination links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

/// Reference to the plan an agreement subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementPlan {
    /// Plan id.
    pub id: String,
}

/// Overrides one of the plan's charge models for this agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideChargeModel {
    /// Id of the overridden charge model.
    pub charge_id: String,
    /// New amount.
    pub amount: Currency,
}

/// A billing agreement.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    /// Agreement id, set once executed.
    #[serde(default)]
    pub id: Option<String>,
    /// State, response only.
    #[serde(default)]
    pub state: Option<String>,
    /// Name.
    pub name: Text<1, 128>,
    /// Description.
    pub description: Text<1, 128>,
    /// First billing date; must be in the future.
    #[serde(with = "iso8601")]
    pub start_date: DateTime<Utc>,
    /// Payer.
    pub payer: Payer,
    /// Shipping address.
    #[serde(default)]
    pub shipping_address: Option<Address>,
    /// Overrides of the plan's merchant preferences.
    #[serde(default)]
    pub override_merchant_preferences: Option<MerchantPreferences>,
    /// Overrides of the plan's charge models.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub override_charge_models: Vec<OverrideChargeModel>,
    /// Subscribed plan.
    pub plan: AgreementPlan,
    /// Related links; `approval_url` is where the payer is sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDescription>,
}

impl Agreement {
    /// Creates an agreement on `plan_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `name` or `description` is empty or over
    /// 128 characters.
    pub fn new(
        name: &str,
        description: &str,
        start_date: DateTime<Utc>,
        payer: Payer,
        plan_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            state: None,
            name: Validated::new(name).map_err(|e| e.at("name"))?,
            description: Validated::new(description).map_err(|e| e.at("description"))?,
            start_date,
            payer,
            shipping_address: None,
            override_merchant_preferences: None,
            override_charge_models: Vec::new(),
            plan: AgreementPlan { id: plan_id.into() },
            links: Vec::new(),
        })
    }

    /// Returns the payer approval URL, if PayPal supplied one.
    #[must_use]
    pub fn approval_url(&self) -> Option<&str> {
        crate::models::common::find_link(&self.links, "approval_url").map(|link| link.href.as_str())
    }
}

/// Body of the suspend, reactivate and cancel endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementStateDescriptor {
    /// Reason for the state change.
    pub note: Text<0, 128>,
    /// Outstanding amount, response only.
    #[serde(default)]
    pub amount: Option<Currency>,
}

impl AgreementStateDescriptor {
    /// A descriptor carrying `note`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `note` is over 128 characters.
    pub fn new(note: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            note: Validated::new(note).map_err(|e| e.at("note"))?,
            amount: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Money;
    use chrono::TimeZone;
    use serde_json::json;

    fn usd(value: &str) -> Currency {
        Currency::from_parts("USD", value.parse().unwrap()).unwrap()
    }

    fn monthly() -> PaymentDefinition {
        PaymentDefinition::new(
            "Regular payment definition",
            PaymentDefinitionType::Regular,
            Frequency::Month,
            2,
            12,
            usd("100"),
        )
        .unwrap()
    }

    #[test]
    fn test_frequency_bounds() {
        assert!(check_frequency(Frequency::Month, 12).is_ok());
        assert!(check_frequency(Frequency::Day, 1).is_ok());
        assert!(check_frequency(Frequency::Year, 1).is_ok());
        let rejected = [(Frequency::Month, 13), (Frequency::Week, 0), (Frequency::Year, 2)];
        for (frequency, interval) in rejected {
            let err = check_frequency(frequency, interval).unwrap_err();
            assert_eq!(err.kind(), ValidationErrorKind::InvalidFrequency);
            assert_eq!(err.identifier(), "invalidFrequency");
        }
    }

    #[test]
    fn test_set_frequency_keeps_previous_pair() {
        let mut definition = monthly();
        let err = definition.set_frequency(Frequency::Year, 2).unwrap_err();
        assert_eq!(err.field(), Some("frequency_interval"));
        assert_eq!(definition.frequency(), Frequency::Month);
        assert_eq!(definition.frequency_interval(), 2);
        definition.set_frequency(Frequency::Year, 1).unwrap();
        assert_eq!(definition.frequency(), Frequency::Year);
    }

    #[test]
    fn test_payment_definition_wire_shape() {
        assert_eq!(
            serde_json::to_value(monthly()).unwrap(),
            json!({
                "name": "Regular payment definition",
                "type": "REGULAR",
                "frequency": "MONTH",
                "frequency_interval": "2",
                "cycles": "12",
                "amount": {"currency": "USD", "value": "100"}
            })
        );
    }

    #[test]
    fn test_payment_definition_decode_checks_frequency() {
        let body = json!({
            "name": "Yearly",
            "type": "REGULAR",
            "frequency": "YEAR",
            "frequency_interval": "3",
            "cycles": "0",
            "amount": {"currency": "USD", "value": "10"}
        });
        let err = serde_json::from_value::<PaymentDefinition>(body).unwrap_err();
        assert!(err.to_string().contains("invalidFrequency"));
    }

    #[test]
    fn test_billing_plan_limits() {
        assert!(BillingPlan::new(&"n".repeat(128), "d", PlanType::Fixed).is_ok());
        let err = BillingPlan::new(&"n".repeat(129), "d", PlanType::Fixed).unwrap_err();
        assert_eq!(err.field(), Some("name"));
        let err = BillingPlan::new("n", &"d".repeat(128), PlanType::Fixed).unwrap_err();
        assert_eq!(err.field(), Some("description"));
    }

    #[test]
    fn test_billing_plan_decodes_response() {
        let plan: BillingPlan = serde_json::from_value(json!({
            "id": "P-94458432VR012762KRWBZEUA",
            "state": "CREATED",
            "name": "T-Shirt of the Month Club Plan",
            "description": "Template creation.",
            "type": "FIXED",
            "payment_definitions": [{
                "id": "PD-50606817NF8063316RWBZEUA",
                "name": "Regular Payments",
                "type": "REGULAR",
                "frequency": "Month",
                "amount": {"currency": "USD", "value": "100"},
                "cycles": "12",
                "charge_models": [{
                    "id": "CHM-55M5618301871492MRWBZEUA",
                    "type": "SHIPPING",
                    "amount": {"currency": "USD", "value": "10"}
                }],
                "frequency_interval": "2"
            }],
            "merchant_preferences": {
                "setup_fee": {"currency": "USD", "value": "1"},
                "max_fail_attempts": "0",
                "return_url": "http://www.paypal.com",
                "cancel_url": "http://www.yahoo.com",
                "auto_bill_amount": "YES",
                "initial_fail_amount_action": "CONTINUE"
            },
            "create_time": "2014-07-31T17:41:55.920Z"
        }))
        .unwrap();
        assert_eq!(plan.state, Some(PlanState::Created));
        let definition = &plan.payment_definitions[0];
        assert_eq!(definition.frequency(), Frequency::Month);
        assert_eq!(definition.frequency_interval(), 2);
        assert_eq!(definition.charge_models[0].kind, ChargeModelType::Shipping);
        let preferences = plan.merchant_preferences.unwrap();
        assert_eq!(preferences.max_fail_attempts, Some(0));
        assert_eq!(preferences.auto_bill_amount, Some(YesNo::Yes));
    }

    #[test]
    fn test_merchant_preferences_generic_over_amount() {
        let (ok, cancel) = ("https://example.com/ok", "https://example.com/cancel");
        let v1 = MerchantPreferences::<Currency>::new(ok, cancel)
            .unwrap()
            .with_setup_fee(usd("1.00"));
        assert_eq!(
            serde_json::to_value(&v1).unwrap()["setup_fee"],
            json!({"currency": "USD", "value": "1.00"})
        );
        let v2: MerchantPreferences<Money> = serde_json::from_value(json!({
            "setup_fee": {"currency_code": "USD", "value": "1.00"},
            "return_url": "https://example.com/ok",
            "cancel_url": "https://example.com/cancel",
            "max_fail_attempts": "3"
        }))
        .unwrap();
        assert_eq!(v2.max_fail_attempts, Some(3));
    }

    #[test]
    fn test_activate_patch() {
        assert_eq!(
            serde_json::to_value(activate_patch()).unwrap(),
            json!([{"op": "replace", "path": "/", "value": {"state": "ACTIVE"}}])
        );
    }

    #[test]
    fn test_agreement_wire_shape() {
        let start = Utc.with_ymd_and_hms(2030, 6, 17, 9, 45, 4).unwrap();
        let agreement = Agreement::new(
            "T-Shirt of the Month Club Agreement",
            "Agreement for T-Shirt of the Month Club Plan",
            start,
            Payer::paypal(),
            "P-94458432VR012762KRWBZEUA",
        )
        .unwrap();
        let value = serde_json::to_value(&agreement).unwrap();
        assert_eq!(value["start_date"], json!("2030-06-17T09:45:04Z"));
        assert_eq!(value["plan"], json!({"id": "P-94458432VR012762KRWBZEUA"}));
        assert_eq!(value["payer"], json!({"payment_method": "paypal"}));
    }

    #[test]
    fn test_state_descriptor_note_limit() {
        assert!(AgreementStateDescriptor::new(&"n".repeat(128)).is_ok());
        assert!(AgreementStateDescriptor::new(&"n".repeat(129)).is_err());
    }
}
