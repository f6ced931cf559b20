//! Trade — an immutable record created the instant a position closes.

use serde::{Deserialize, Serialize};

use super::position::PositionSide;
use crate::decimal::FixedDecimal;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Signal,
    StopLoss,
    TakeProfit,
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Signal => "signal",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::EndOfData => "end_of_data",
        }
    }
}

/// A completed round-trip trade. Appended to the ledger at close and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub side: PositionSide,
    pub entry_price: FixedDecimal,
    pub exit_price: FixedDecimal,
    /// Fraction of equity that was allocated at open.
    pub size: FixedDecimal,
    pub quantity: FixedDecimal,
    /// Net PnL: gross minus entry and exit commission.
    pub pnl: FixedDecimal,
    /// Net PnL over entry cost basis; zero when the basis is zero.
    pub return_rate: FixedDecimal,
    pub entry_index: usize,
    pub exit_index: usize,
    pub exit_reason: ExitReason,
}

impl Trade {
    /// A win is strictly positive PnL; zero PnL counts as a loss.
    pub fn is_winner(&self) -> bool {
        self.pnl > FixedDecimal::ZERO
    }

    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}
