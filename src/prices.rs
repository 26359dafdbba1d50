//! Prices
//!
//! All monetary values are [`Money`] amounts held in integer minor units of a single ISO
//! currency. Percentage reductions are computed in decimal space and rounded back to whole
//! minor units, midpoint away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// A monetary amount in one ISO currency.
pub type Price = Money<'static, Currency>;

/// Errors raised by price arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Minor-unit arithmetic overflowed `i64`.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Two amounts in different currencies were combined (left, right).
    #[error("cannot combine {0} with {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Build a price from whole major units (e.g. rupees, pounds).
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the amount does not fit in minor units.
pub fn from_major(amount: i64, currency: &'static Currency) -> Result<Price, PriceError> {
    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or(PriceError::Overflow)?;

    amount
        .checked_mul(scale)
        .map(|minor| Money::from_minor(minor, currency))
        .ok_or(PriceError::Overflow)
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}

/// Multiply a unit price by a number of units.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the product does not fit in minor units.
pub fn price_times(price: &Price, units: u32) -> Result<Price, PriceError> {
    price
        .to_minor_units()
        .checked_mul(i64::from(units))
        .map(|minor| Money::from_minor(minor, price.currency()))
        .ok_or(PriceError::Overflow)
}

/// Add two prices of the same currency.
///
/// # Errors
///
/// Returns [`PriceError::CurrencyMismatch`] or [`PriceError::Overflow`].
pub fn checked_add(left: &Price, right: &Price) -> Result<Price, PriceError> {
    ensure_same_currency(left, right)?;

    left.to_minor_units()
        .checked_add(right.to_minor_units())
        .map(|minor| Money::from_minor(minor, left.currency()))
        .ok_or(PriceError::Overflow)
}

/// Subtract `right` from `left`.
///
/// # Errors
///
/// Returns [`PriceError::CurrencyMismatch`] or [`PriceError::Overflow`].
pub fn checked_sub(left: &Price, right: &Price) -> Result<Price, PriceError> {
    ensure_same_currency(left, right)?;

    left.to_minor_units()
        .checked_sub(right.to_minor_units())
        .map(|minor| Money::from_minor(minor, left.currency()))
        .ok_or(PriceError::Overflow)
}

/// The amount `percent` of `price` represents, rounded to whole minor units.
///
/// # Errors
///
/// Returns [`PriceError::PercentConversion`] if the calculation overflows.
pub fn percent_of(price: &Price, percent: &Percentage) -> Result<Price, PriceError> {
    let minor = percent_of_minor(percent, price.to_minor_units())?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculate the percentage of a minor unit amount, rounded to whole minor units.
///
/// # Errors
///
/// Returns [`PriceError::PercentConversion`] if the percentage calculation overflows or
/// cannot be represented in `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PriceError> {
    let minor = Decimal::from_i64(minor).ok_or(PriceError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PriceError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PriceError::PercentConversion)
}

/// Percent points (e.g. `10` for 10%) of a fractional percentage.
pub fn percent_points(percent: Percentage) -> Decimal {
    (percent * Decimal::ONE_HUNDRED).normalize()
}

/// Resolve the ISO currencies understood by the fixture loader.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(iso::GBP),
        "USD" => Some(iso::USD),
        "EUR" => Some(iso::EUR),
        "PKR" => Some(iso::PKR),
        "INR" => Some(iso::INR),
        _ => None,
    }
}

fn ensure_same_currency(left: &Price, right: &Price) -> Result<(), PriceError> {
    if left.currency() == right.currency() {
        Ok(())
    } else {
        Err(PriceError::CurrencyMismatch(
            left.currency().iso_alpha_code,
            right.currency().iso_alpha_code,
        ))
    }
}
