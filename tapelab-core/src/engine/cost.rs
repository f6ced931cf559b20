//! Execution costs — directional slippage and per-side commission.
//!
//! Slippage is adverse by construction: buyers fill higher, sellers fill
//! lower. Commission is charged independently on entry and exit notional.

use crate::decimal::FixedDecimal;
use crate::engine::options::BacktestOptions;

/// Which way a fill crosses the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Cost model for execution friction, expressed as fractional rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub slippage_rate: FixedDecimal,
    pub commission_rate: FixedDecimal,
}

impl CostModel {
    pub fn new(slippage_rate: FixedDecimal, commission_rate: FixedDecimal) -> Self {
        Self {
            slippage_rate,
            commission_rate,
        }
    }

    pub fn from_options(options: &BacktestOptions) -> Self {
        Self::new(options.slippage_rate, options.commission_rate)
    }

    pub fn frictionless() -> Self {
        Self::new(FixedDecimal::ZERO, FixedDecimal::ZERO)
    }

    /// Apply directional slippage to a raw reference price.
    pub fn fill_price(&self, raw_price: FixedDecimal, side: OrderSide) -> FixedDecimal {
        if self.slippage_rate.is_zero() {
            return raw_price;
        }
        match side {
            OrderSide::Buy => raw_price * (FixedDecimal::ONE + self.slippage_rate),
            OrderSide::Sell => raw_price * (FixedDecimal::ONE - self.slippage_rate),
        }
    }

    /// Commission on one side: `fill_price × quantity × commission_rate`.
    pub fn commission(&self, fill_price: FixedDecimal, quantity: FixedDecimal) -> FixedDecimal {
        fill_price * quantity * self.commission_rate
    }
}
