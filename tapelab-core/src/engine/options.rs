//! Backtest configuration with defaults and eager validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::FixedDecimal;

/// Malformed option values. Raised once at entry-point invocation, never
/// mid-run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(FixedDecimal),
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange {
        name: &'static str,
        value: FixedDecimal,
    },
}

/// Options for a single backtest run.
///
/// All fields are concrete; partial configuration happens at the public
/// boundary via `Default` plus the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOptions {
    pub initial_capital: FixedDecimal,
    /// Commission charged per side on fill notional, as a fraction.
    pub commission_rate: FixedDecimal,
    /// Adverse fill-price slippage per side, as a fraction.
    pub slippage_rate: FixedDecimal,
    pub allow_short: bool,
}

impl Default for BacktestOptions {
    fn default() -> Self {
        Self {
            initial_capital: FixedDecimal::from_i64(10_000),
            commission_rate: FixedDecimal::ZERO,
            slippage_rate: FixedDecimal::ZERO,
            allow_short: true,
        }
    }
}

impl BacktestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capital(mut self, capital: FixedDecimal) -> Self {
        self.initial_capital = capital;
        self
    }

    pub fn with_commission_rate(mut self, rate: FixedDecimal) -> Self {
        self.commission_rate = rate;
        self
    }

    pub fn with_slippage_rate(mut self, rate: FixedDecimal) -> Self {
        self.slippage_rate = rate;
        self
    }

    pub fn with_allow_short(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    /// Reject malformed options before the first bar is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_capital.is_sign_positive() {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        check_rate("commission_rate", self.commission_rate)?;
        check_rate("slippage_rate", self.slippage_rate)?;
        Ok(())
    }
}

fn check_rate(name: &'static str, value: FixedDecimal) -> Result<(), ConfigError> {
    if value < FixedDecimal::ZERO || value > FixedDecimal::ONE {
        return Err(ConfigError::RateOutOfRange { name, value });
    }
    Ok(())
}
