//! Per-API controllers. Each one borrows the [`PayPalClient`] and maps a
//! PayPal endpoint to a typed call.

use crate::client::PayPalClient;

mod billing_agreements;
mod billing_plans;
mod disputes;
mod invoices;
mod managed_accounts;
mod orders;
mod payments;
mod vault;

pub use billing_agreements::BillingAgreements;
pub use billing_plans::BillingPlans;
pub use disputes::Disputes;
pub use invoices::Invoices;
pub use managed_accounts::ManagedAccounts;
pub use orders::Orders;
pub use payments::Payments;
pub use vault::Vault;

impl PayPalClient {
    /// v2 Checkout orders.
    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    /// v1 Payments.
    #[must_use]
    pub const fn payments(&self) -> Payments<'_> {
        Payments::new(self)
    }

    /// v1 Invoicing.
    #[must_use]
    pub const fn invoices(&self) -> Invoices<'_> {
        Invoices::new(self)
    }

    /// v1 Billing plans.
    #[must_use]
    pub const fn billing_plans(&self) -> BillingPlans<'_> {
        BillingPlans::new(self)
    }

    /// v1 Billing agreements.
    #[must_use]
    pub const fn billing_agreements(&self) -> BillingAgreements<'_> {
        BillingAgreements::new(self)
    }

    /// v1 Customer disputes.
    #[must_use]
    pub const fn disputes(&self) -> Disputes<'_> {
        Disputes::new(self)
    }

    /// v3 Managed accounts.
    #[must_use]
    pub const fn managed_accounts(&self) -> ManagedAccounts<'_> {
        ManagedAccounts::new(self)
    }

    /// v1 Vault credit cards.
    #[must_use]
    pub const fn vault(&self) -> Vault<'_> {
        Vault::new(self)
    }
}

/// Percent-encodes a resource id for use as one path segment.
pub(crate) fn segment(id: &str) -> String {
    // `byte_serialize` writes spaces as `+`; a literal `+` comes out as `%2B`.
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Shared wiremock setup for controller tests.
#[cfg(test)]
pub(crate) mod test_support {
    use paypal::{Configuration, Environment};
    use wiremock::MockServer;

    use crate::auth::AuthInfo;
    use crate::client::PayPalClient;

    pub(crate) async fn authenticated_client(server: &MockServer) -> PayPalClient {
        let environment = Environment::custom(&server.uri()).unwrap();
        let client = PayPalClient::new(Configuration::new("id", "secret", environment));
        client.tokens().replace(AuthInfo::new("T", "Bearer")).await;
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_path_characters() {
        assert_eq!(segment("INV2-8ZVH-2PRV-2SB3-TDAA"), "INV2-8ZVH-2PRV-2SB3-TDAA");
        assert_eq!(segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(segment("a b+c"), "a%20b%2Bc");
    }
}
