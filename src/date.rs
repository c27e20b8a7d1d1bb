//! Calendar day parsed from the fixed `YYYY-MM-DD` layout.

use crate::error::BalanceError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Layout of a date literal on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Literal token the remote service uses for a missing date.
pub const ABSENT_TOKEN: &str = "null";

/// A calendar day without a time-of-day component.
///
/// A missing date is the zero date `0001-01-01` (`Date::ABSENT`), so it shares
/// a key with that literal day and orders before every later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    /// The zero date, standing in for an absent one.
    pub const ABSENT: Self = match NaiveDate::from_ymd_opt(1, 1, 1) {
        Some(day) => Date(day),
        None => panic!("0001-01-01 is a valid date"),
    };

    /// Creates a date from its year, month and day, if they name a real day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// Returns `true` for the zero date.
    pub fn is_absent(&self) -> bool {
        *self == Date::ABSENT
    }
}

impl Default for Date {
    fn default() -> Self {
        Date::ABSENT
    }
}

/// Checks the literal is exactly `dddd-dd-dd`.
///
/// chrono alone accepts unpadded fields and signed years.
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for Date {
    type Err = BalanceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == ABSENT_TOKEN {
            return Ok(Date::ABSENT);
        }
        if !has_date_shape(s) {
            return Err(BalanceError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Date)
            .map_err(|_| BalanceError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => Date::from_str(&s).map_err(serde::de::Error::custom),
            None => Ok(Date::ABSENT),
        }
    }
}
