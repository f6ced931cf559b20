//! Position — the single live holding tracked by the state machine.

use serde::{Deserialize, Serialize};

use crate::decimal::FixedDecimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

/// An open position. At most one exists per backtest run, owned by the
/// state machine's current-state slot from the bar it opens on until the
/// bar it closes or reverses on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    /// Fill price after entry slippage.
    pub entry_price: FixedDecimal,
    pub quantity: FixedDecimal,
    /// Fraction of equity allocated at open.
    pub size: FixedDecimal,
    pub entry_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<FixedDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<FixedDecimal>,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Entry notional: entry price × quantity.
    pub fn cost_basis(&self) -> FixedDecimal {
        self.entry_price * self.quantity
    }

    /// Mark-to-market PnL at `price`, before exit costs.
    pub fn unrealized_pnl(&self, price: FixedDecimal) -> FixedDecimal {
        match self.side {
            PositionSide::Long => (price - self.entry_price) * self.quantity,
            PositionSide::Short => (self.entry_price - price) * self.quantity,
        }
    }
}
