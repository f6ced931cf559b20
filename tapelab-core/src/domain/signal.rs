//! StrategySignal — the per-bar recommendation a strategy hands the engine.

use serde::{Deserialize, Serialize};

use crate::decimal::FixedDecimal;

/// What the strategy wants done on this bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    Long,
    Short,
    Close,
    Hold,
}

/// A strategy's recommendation for one bar.
///
/// The engine treats this as opaque advice: stop-loss and take-profit
/// triggers override it, and `short` is subject to the `allow_short`
/// option. `size` is a fraction of current equity in `(0, 1]` (default:
/// full equity); `stop_loss` and `take_profit` are price levels carried
/// onto the opened position verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySignal {
    pub action: SignalAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FixedDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<FixedDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<FixedDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StrategySignal {
    pub fn new(action: SignalAction) -> Self {
        Self {
            action,
            size: None,
            stop_loss: None,
            take_profit: None,
            reason: None,
        }
    }

    pub fn long() -> Self {
        Self::new(SignalAction::Long)
    }

    pub fn short() -> Self {
        Self::new(SignalAction::Short)
    }

    pub fn close() -> Self {
        Self::new(SignalAction::Close)
    }

    pub fn hold() -> Self {
        Self::new(SignalAction::Hold)
    }

    pub fn with_size(mut self, size: FixedDecimal) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_stop_loss(mut self, price: FixedDecimal) -> Self {
        self.stop_loss = Some(price);
        self
    }

    pub fn with_take_profit(mut self, price: FixedDecimal) -> Self {
        self.take_profit = Some(price);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
