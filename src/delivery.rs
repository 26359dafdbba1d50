//! Delivery estimates
//!
//! A placeholder estimate: a uniformly random number of days. The randomness source is
//! passed in so callers can seed it.

use std::{fmt, ops::RangeInclusive};

use rand::Rng;

/// Fewest days an estimate can give.
pub const MIN_DAYS: u8 = 2;

/// Most days an estimate can give.
pub const MAX_DAYS: u8 = 6;

/// Estimated delivery time in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryEstimate {
    days: u8,
}

impl DeliveryEstimate {
    /// Draw an estimate from `rng`.
    pub fn estimate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            days: rng.gen_range(Self::range()),
        }
    }

    /// The range estimates are drawn from.
    pub fn range() -> RangeInclusive<u8> {
        MIN_DAYS..=MAX_DAYS
    }

    /// Estimated days until delivery.
    pub fn days(self) -> u8 {
        self.days
    }
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days)
    }
}
