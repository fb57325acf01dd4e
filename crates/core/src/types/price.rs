//! Prices in integer cents.
//!
//! The backend stores every monetary amount as an integer number of cents.
//! Arithmetic stays in integers; `rust_decimal` is only used to render the
//! amount in currency units.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in cents.
///
/// Serializes as a bare integer, matching the `price`, `total` and
/// `priceAtPurchase` fields on the wire.
///
/// ```
/// use threadline_core::Price;
///
/// let unit = Price::from_cents(12_800);
/// assert_eq!(unit * 2, Price::from_cents(25_600));
/// assert_eq!(unit.to_string(), "$128.00");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create a price from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in currency units (e.g. dollars), exact.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.amount())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
