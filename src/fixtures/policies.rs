//! Pricing Policy Fixtures

use serde::Deserialize;

use crate::{
    checkout::PricingPolicy,
    fixtures::{
        FixtureError,
        products::{parse_percentage, parse_price},
    },
    prices::Price,
};

/// Wrapper for a pricing policy in YAML
#[derive(Debug, Deserialize)]
pub struct PoliciesFixture {
    /// The policy
    pub policy: PolicyFixture,
}

/// Pricing policy fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PolicyFixture {
    /// Category whose lines get one free unit per bundle
    pub bundle_category: String,

    /// Units per bundle; zero disables bundling
    pub bundle_size: u32,

    /// Minimum line quantity for the bulk discount
    pub bulk_min_quantity: u32,

    /// Bulk discount (e.g., "10%")
    pub bulk_discount: String,

    /// Subtotal above which the large order discount applies (e.g., "50000 PKR")
    pub large_order_threshold: String,

    /// Large order discount (e.g., "5%")
    pub large_order_discount: String,

    /// Totals above this ship free
    pub free_delivery_threshold: String,

    /// Delivery charge for totals at or below the free delivery threshold
    pub delivery_surcharge: String,
}

impl TryFrom<PolicyFixture> for PricingPolicy {
    type Error = FixtureError;

    fn try_from(fixture: PolicyFixture) -> Result<Self, Self::Error> {
        let large_order_threshold = parse_price(&fixture.large_order_threshold)?;
        let free_delivery_threshold = parse_price(&fixture.free_delivery_threshold)?;
        let delivery_surcharge = parse_price(&fixture.delivery_surcharge)?;

        if delivery_surcharge.to_minor_units() < 0 {
            return Err(FixtureError::InvalidPolicy(
                "delivery_surcharge must not be negative".to_string(),
            ));
        }

        same_currency(&delivery_surcharge, &large_order_threshold)?;
        same_currency(&delivery_surcharge, &free_delivery_threshold)?;

        Ok(PricingPolicy {
            bundle_category: fixture.bundle_category,
            bundle_size: fixture.bundle_size,
            bulk_min_quantity: fixture.bulk_min_quantity,
            bulk_discount: parse_percentage(&fixture.bulk_discount)?,
            large_order_threshold,
            large_order_discount: parse_percentage(&fixture.large_order_discount)?,
            free_delivery_threshold,
            delivery_surcharge,
        })
    }
}

fn same_currency(expected: &Price, found: &Price) -> Result<(), FixtureError> {
    if expected.currency() == found.currency() {
        return Ok(());
    }

    Err(FixtureError::CurrencyMismatch(
        expected.currency().iso_alpha_code.to_string(),
        found.currency().iso_alpha_code.to_string(),
    ))
}
