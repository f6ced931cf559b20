//! BacktestSnapshot — the per-bar view emitted by the streaming driver.

use serde::{Deserialize, Serialize};

use super::{NormalizedBar, Position, StrategySignal, Trade};
use crate::decimal::FixedDecimal;

/// Everything known about the run after one bar has been processed.
///
/// Ephemeral: consumed by the caller bar by bar. `equity` is realized
/// capital only; `total_equity` adds the open position's mark-to-market
/// PnL at this bar's close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestSnapshot {
    pub index: usize,
    pub bar: NormalizedBar,
    /// The strategy's signal for this bar, recorded even when a stop or
    /// take-profit trigger discarded it.
    pub signal: StrategySignal,
    pub position: Option<Position>,
    pub equity: FixedDecimal,
    pub unrealized_pnl: FixedDecimal,
    pub total_equity: FixedDecimal,
    pub closed_trade: Option<Trade>,
}
