//! Tick-quantized price type
//!
//! Prices are stored as an integer number of ticks (tick size 0.05) so that
//! equality and ordering are exact integer comparisons with no floating-point
//! representation error. Decimal arithmetic appears only at the API boundary:
//! construction quantizes a decimal onto the tick grid, and display/serde
//! render the decimal form. Serialized as a string to prevent JSON number
//! precision loss.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price as an integer tick count
///
/// Must always be positive when constructed through the checked boundary
/// constructors. `from_ticks` is the raw escape hatch for internal use and
/// tests; consumers that accept external input must go through `new`/`try_new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// The minimum price increment
    pub fn tick_size() -> Decimal {
        Decimal::new(5, 2) // 0.05
    }

    /// Create a new Price from a Decimal, quantizing to the nearest tick
    ///
    /// # Panics
    /// Panics if the quantized price is not strictly positive
    pub fn new(value: Decimal) -> Self {
        Self::try_new(value).expect("Price must be positive")
    }

    /// Try to create a Price, returning None if the quantized value is not
    /// strictly positive or does not fit a tick count
    pub fn try_new(value: Decimal) -> Option<Self> {
        let ticks = (value / Self::tick_size()).round().to_i64()?;
        if ticks > 0 {
            Some(Self(ticks))
        } else {
            None
        }
    }

    /// Create from a whole-unit integer (tests/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Create from a string
    pub fn from_str(s: &str) -> Result<Self, rust_decimal::Error> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }

    /// Try to create from an f64, quantizing to the nearest tick
    pub fn try_from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).and_then(Self::try_new)
    }

    /// Create from a raw tick count with no positivity check
    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Get the raw tick count
    pub fn ticks(&self) -> i64 {
        self.0
    }

    /// Get the decimal value (ticks × tick size)
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0) * Self::tick_size()
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_decimal().normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must be positive"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}
