use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// Decimal places of every on-chain amount (stroops for XLM, same for the pool token)
pub const SCALE_DECIMALS: u32 = 7;

/// Integer units per whole token
pub const UNITS_PER_TOKEN: i128 = 10_000_000;

/// Token amount in scaled integer units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScaledAmount(pub i128);

impl ScaledAmount {
    /// Creates an amount from raw units
    pub fn from_units(units: i128) -> Self {
        Self(units)
    }

    /// Converts a human-readable decimal, rounding to the nearest unit
    pub fn from_decimal(value: f64) -> crate::Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(format!("{} is not a finite number", value)));
        }

        let scaled = (value * UNITS_PER_TOKEN as f64).round();
        if scaled.abs() >= i128::MAX as f64 {
            return Err(Error::InvalidAmount(format!("{} is out of range", value)));
        }

        Ok(Self(scaled as i128))
    }

    /// Converts back to a human-readable decimal
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / UNITS_PER_TOKEN as f64
    }

    /// Raw units
    pub fn units(&self) -> i128 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ScaledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = UNITS_PER_TOKEN as u128;
        write!(f, "{}{}.{:07}", sign, abs / scale, abs % scale)
    }
}
