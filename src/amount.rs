//! Currency amount with exactly 2 decimal places.
//!
//! Amounts are kept as `rust_decimal` values rounded to the cent, and only
//! become integer cents at render time.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A currency value rounded to whole cents.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ach_encoder::Amount;
///
/// let amount = Amount::from_str("12.34").unwrap();
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates an `Amount` from a `Decimal`, rounding half away from zero to the cent.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Amount(rounded)
    }

    /// Creates an `Amount` from an integer number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, Self::SCALE))
    }

    /// Returns the value in whole cents, or 0 for negative amounts.
    pub fn cents(&self) -> u64 {
        self.checked_cents().unwrap_or(0)
    }

    /// Returns the value in whole cents, or `None` if it is negative or
    /// too large to represent.
    pub fn checked_cents(&self) -> Option<u64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.trunc().to_u64())
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
