//! Checkout
//!
//! Pricing for a snapshot of cart entries. Discounts are applied in a fixed order:
//!
//! 1. Bundle pricing on the bundle category: every `bundle_size` units, one is free.
//! 2. Bulk discount on any line with at least `bulk_min_quantity` units, applied to the
//!    already-bundled line price.
//! 3. Large order discount on the summed lines once they exceed `large_order_threshold`.
//! 4. Delivery surcharge added when the discounted total is at or below
//!    `free_delivery_threshold`.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::CartEntry,
    prices::{self, Price, PriceError},
    products::ProductId,
};

/// Errors that can occur while pricing a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing to price.
    #[error("cart is empty")]
    EmptyCart,

    /// A product is priced in a different currency from the policy (product, product currency, policy currency).
    #[error("Product {0} has currency {1}, but pricing policy has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// The constants that drive checkout pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Category priced as "buy `bundle_size - 1`, get one free".
    pub bundle_category: String,

    /// Every `bundle_size` units of the bundle category, one is free. Zero disables bundling.
    pub bundle_size: u32,

    /// Minimum line quantity for the bulk discount.
    pub bulk_min_quantity: u32,

    /// Discount on qualifying lines.
    pub bulk_discount: Percentage,

    /// Subtotal the order must exceed for the large order discount.
    pub large_order_threshold: Price,

    /// Discount on the whole order once it exceeds the threshold.
    pub large_order_discount: Percentage,

    /// Orders at or below this total pay the delivery surcharge.
    pub free_delivery_threshold: Price,

    /// Flat delivery charge for small orders.
    pub delivery_surcharge: Price,
}

impl PricingPolicy {
    /// The reference policy: Clothes 3-for-2, 10% off lines of 3+, 5% off orders over
    /// 50 000, and a 200 delivery charge up to 20 000.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the thresholds cannot be represented in `currency`.
    pub fn reference(currency: &'static Currency) -> Result<Self, PriceError> {
        Ok(Self {
            bundle_category: "Clothes".to_string(),
            bundle_size: 3,
            bulk_min_quantity: 3,
            bulk_discount: Percentage::from(Decimal::new(10, 2)),
            large_order_threshold: prices::from_major(50_000, currency)?,
            large_order_discount: Percentage::from(Decimal::new(5, 2)),
            free_delivery_threshold: prices::from_major(20_000, currency)?,
            delivery_surcharge: prices::from_major(200, currency)?,
        })
    }

    /// Currency the policy's thresholds are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.delivery_surcharge.currency()
    }
}

/// Pricing breakdown for a single cart entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineQuote {
    /// Product on the line
    pub product: ProductId,

    /// Units on the line
    pub quantity: u32,

    /// Units charged after bundle pricing
    pub payable_units: u32,

    /// Unit price times quantity, before any discount
    pub base_price: Price,

    /// Bulk discount taken off the bundled line price
    pub bulk_discount: Price,

    /// Final line price
    pub total: Price,
}

impl LineQuote {
    /// Units given away by bundle pricing.
    pub fn free_units(&self) -> u32 {
        self.quantity - self.payable_units
    }

    /// Everything saved on this line.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the subtraction overflows.
    pub fn savings(&self) -> Result<Price, PriceError> {
        prices::checked_sub(&self.base_price, &self.total)
    }
}

/// Full pricing breakdown for a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    lines: SmallVec<[LineQuote; 8]>,
    subtotal: Price,
    large_order_discount: Price,
    delivery_charge: Price,
    total: Price,
}

impl Quote {
    /// Per-line breakdown in cart order.
    pub fn lines(&self) -> &[LineQuote] {
        &self.lines
    }

    /// Sum of line totals, before the large order discount and delivery.
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Amount taken off the subtotal by the large order discount.
    pub fn large_order_discount(&self) -> Price {
        self.large_order_discount
    }

    /// Delivery surcharge, zero for free delivery.
    pub fn delivery_charge(&self) -> Price {
        self.delivery_charge
    }

    /// Whether the order qualified for free delivery.
    pub fn free_delivery(&self) -> bool {
        self.delivery_charge.to_minor_units() == 0
    }

    /// Final amount payable.
    pub fn total(&self) -> Price {
        self.total
    }

    /// Total saved across bundle, bulk and large order discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the arithmetic overflows.
    pub fn savings(&self) -> Result<Price, PriceError> {
        let line_savings = self
            .lines
            .iter()
            .try_fold(prices::zero(self.total.currency()), |acc, line| {
                prices::checked_add(&acc, &line.savings()?)
            })?;

        prices::checked_add(&line_savings, &self.large_order_discount)
    }
}

/// Prices cart snapshots under a [`PricingPolicy`].
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    policy: PricingPolicy,
}

impl CheckoutEngine {
    /// Create an engine for the given policy.
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    /// The policy in force.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Price a snapshot of cart entries.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: no entries were given.
    /// - [`CheckoutError::CurrencyMismatch`]: an entry is priced in another currency.
    /// - [`CheckoutError::Price`]: money arithmetic overflowed.
    pub fn quote(&self, entries: &[CartEntry]) -> Result<Quote, CheckoutError> {
        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let currency = self.policy.currency();

        let lines = entries
            .iter()
            .map(|entry| self.line_quote(entry))
            .collect::<Result<SmallVec<[LineQuote; 8]>, _>>()?;

        let subtotal = lines
            .iter()
            .try_fold(prices::zero(currency), |acc, line| {
                prices::checked_add(&acc, &line.total)
            })?;

        let large_order_discount =
            if subtotal.to_minor_units() > self.policy.large_order_threshold.to_minor_units() {
                prices::percent_of(&subtotal, &self.policy.large_order_discount)?
            } else {
                prices::zero(currency)
            };

        let discounted = prices::checked_sub(&subtotal, &large_order_discount)?;

        let delivery_charge =
            if discounted.to_minor_units() <= self.policy.free_delivery_threshold.to_minor_units() {
                self.policy.delivery_surcharge
            } else {
                prices::zero(currency)
            };

        let total = prices::checked_add(&discounted, &delivery_charge)?;

        Ok(Quote {
            lines,
            subtotal,
            large_order_discount,
            delivery_charge,
            total,
        })
    }

    /// Price a single entry: bundle pricing first, then the bulk discount.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] on currency mismatch or arithmetic overflow.
    pub fn line_quote(&self, entry: &CartEntry) -> Result<LineQuote, CheckoutError> {
        let product = entry.product();
        let quantity = entry.quantity();
        let policy_currency = self.policy.currency();

        if product.price.currency() != policy_currency {
            return Err(CheckoutError::CurrencyMismatch(
                product.id,
                product.price.currency().iso_alpha_code,
                policy_currency.iso_alpha_code,
            ));
        }

        let payable_units = self.payable_units(&product.category, quantity);
        let base_price = prices::price_times(&product.price, quantity)?;
        let bundled = prices::price_times(&product.price, payable_units)?;

        let bulk_discount = if quantity >= self.policy.bulk_min_quantity {
            prices::percent_of(&bundled, &self.policy.bulk_discount)?
        } else {
            prices::zero(policy_currency)
        };

        let total = prices::checked_sub(&bundled, &bulk_discount)?;

        Ok(LineQuote {
            product: product.id,
            quantity,
            payable_units,
            base_price,
            bulk_discount,
            total,
        })
    }

    fn payable_units(&self, category: &str, quantity: u32) -> u32 {
        if category != self.policy.bundle_category {
            return quantity;
        }

        quantity - quantity.checked_div(self.policy.bundle_size).unwrap_or(0)
    }
}
