use crate::error::SimulationError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Funds held by the contract or accumulated by a campaign, in ETH.
///
/// Decimal-backed so a long run of small donations sums exactly. A balance
/// can reach zero but never go below it: credits use plain addition, debits
/// only exist as [`Balance::checked_sub`], which refuses to overdraw.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Debits `rhs`, or `None` when the debit would overdraw this balance.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        if rhs.0 > self.0 {
            None
        } else {
            Some(Self(self.0 - rhs.0))
        }
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive quantity of funds.
///
/// Donation amounts and campaign goals are `Amount`s; the validating
/// constructor is the only way in, so a held `Amount` is proof the value
/// already passed the positivity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SimulationError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SimulationError::ValidationError(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
