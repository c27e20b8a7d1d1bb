//! Fixed-point monetary amount with 2 decimal places.
//!
//! Uses `rust_decimal` internally with scale enforcement so summation is exact
//! and independent of the order in which amounts are added.

use crate::error::BalanceError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A monetary amount that maintains exactly 2 decimal places.
///
/// With the scale pinned at 2, the underlying mantissa is the number of minor
/// units (cents), so every addition is an exact integer addition.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use daily_balances::Amount;
///
/// let amount = Amount::from_str("100.499").unwrap();
/// assert_eq!(amount.to_string(), "100.50");
/// assert_eq!(amount.minor_units(), 10050);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, rounding half away from zero to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded = value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Amount(rounded)
    }

    /// Creates an amount from a whole number of minor units.
    pub fn from_minor_units(cents: i64) -> Self {
        Amount(Decimal::new(cents, Self::SCALE))
    }

    /// Returns the amount as a count of minor units (cents).
    pub fn minor_units(&self) -> i128 {
        self.0.mantissa()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Checks the literal is an optionally signed run of digits with at most one
/// decimal point.
///
/// `Decimal::from_str` alone also takes digit separators (`1_000`).
fn has_decimal_shape(s: &str) -> bool {
    let unsigned = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Amount {
    type Err = BalanceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if !has_decimal_shape(s) {
            return Err(BalanceError::InvalidAmount(s.to_string()));
        }
        let decimal = Decimal::from_str(s).map_err(|_| BalanceError::InvalidAmount(s.to_string()))?;
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
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
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
