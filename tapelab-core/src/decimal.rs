//! FixedDecimal — the engine's exact decimal numeric type.
//!
//! Every price, quantity, and money amount flowing through the engine is a
//! `FixedDecimal`: a scaled-integer decimal normalized to at most 18
//! fractional digits. Arithmetic is exact or explicitly rounded (banker's
//! rounding back to the engine scale); division by zero is a reported
//! error, never a silent NaN or infinity. Conversion from and to floating
//! point happens only at the input/output boundary.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fractional digits carried by every engine value.
pub const SCALE: u32 = 18;

/// Numeric failures surfaced by `FixedDecimal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("value cannot be represented as a fixed decimal: {0}")]
    Unrepresentable(String),
}

/// A decimal value held to the engine scale.
///
/// Backed by a 96-bit integer mantissa with an explicit decimal scale;
/// every operation that could deepen the scale rescales the result back to
/// [`SCALE`] digits. Equality and ordering are numeric (`1.0 == 1.00`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FixedDecimal(Decimal);

impl FixedDecimal {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Clamp a raw decimal back to the engine scale.
    fn rescaled(inner: Decimal) -> Self {
        if inner.scale() > SCALE {
            Self(inner.round_dp(SCALE))
        } else {
            Self(inner)
        }
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    /// Lossy float boundary. Non-finite input is rejected.
    pub fn from_f64(value: f64) -> Result<Self, DecimalError> {
        if !value.is_finite() {
            return Err(DecimalError::Unrepresentable(value.to_string()));
        }
        Decimal::from_f64(value)
            .map(Self::rescaled)
            .ok_or_else(|| DecimalError::Unrepresentable(value.to_string()))
    }

    /// Float boundary for reporting. Precision beyond `f64` is dropped.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// Checked division. A zero denominator is an error, not a NaN.
    pub fn checked_div(self, rhs: Self) -> Result<Self, DecimalError> {
        if rhs.0.is_zero() {
            return Err(DecimalError::DivisionByZero);
        }
        self.0
            .checked_div(rhs.0)
            .map(Self::rescaled)
            .ok_or_else(|| DecimalError::Unrepresentable(format!("{} / {}", self.0, rhs.0)))
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_sign_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative()
    }

    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl From<i64> for FixedDecimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<Decimal> for FixedDecimal {
    fn from(value: Decimal) -> Self {
        Self::rescaled(value)
    }
}

impl FromStr for FixedDecimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Self::rescaled)
            .map_err(|e| DecimalError::Unrepresentable(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for FixedDecimal {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::rescaled(self.0 + rhs.0)
    }
}

impl Sub for FixedDecimal {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::rescaled(self.0 - rhs.0)
    }
}

impl Mul for FixedDecimal {
    type Output = Self;

    /// Product of two engine-scale values, rescaled back down by one scale
    /// factor (never left at the squared scale).
    fn mul(self, rhs: Self) -> Self {
        Self::rescaled(self.0 * rhs.0)
    }
}

impl Neg for FixedDecimal {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign for FixedDecimal {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedDecimal {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for FixedDecimal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a FixedDecimal> for FixedDecimal {
    fn sum<I: Iterator<Item = &'a FixedDecimal>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + *v)
    }
}
