//! Batch execution driver — one pass over a finite bar sequence.

use serde::{Deserialize, Serialize};

use crate::decimal::FixedDecimal;
use crate::domain::{ExitReason, NormalizedBar, Trade};
use crate::engine::cost::CostModel;
use crate::engine::options::BacktestOptions;
use crate::engine::state::{BacktestError, EngineState};
use crate::engine::update::close_position;
use crate::metrics::BacktestStatistics;
use crate::strategy::Strategy;

/// Complete result of a batch backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub statistics: BacktestStatistics,
    /// Total equity per bar; always exactly one entry per input bar, and
    /// the final entry equals `final_equity`.
    pub equity_curve: Vec<FixedDecimal>,
    pub final_equity: FixedDecimal,
}

/// Run a strategy over a finite, chronologically ordered bar sequence.
///
/// The strategy is called exactly once per bar, in order. Any position
/// still open after the last bar is force-closed at that bar's close with
/// [`ExitReason::EndOfData`], and the last equity-curve entry is
/// overwritten with final realized equity.
pub fn run_backtest(
    strategy: &mut dyn Strategy,
    bars: &[NormalizedBar],
    options: &BacktestOptions,
) -> Result<BacktestResult, BacktestError> {
    let mut state = EngineState::new(options.clone())?;

    for bar in bars {
        state.step(strategy, bar)?;
    }

    if let Some(position) = state.take_position() {
        // Unwrap is safe: the position was opened on some bar, so bars is
        // non-empty.
        let last_index = bars.len() - 1;
        let last_bar = &bars[last_index];
        let costs = CostModel::from_options(state.options());
        let trade = close_position(
            &position,
            last_bar.close,
            last_index,
            ExitReason::EndOfData,
            &costs,
        );
        state.ledger_mut().record_forced_close(trade);
    }

    let (trades, equity_curve, final_equity) = state.into_ledger().into_parts();
    let statistics = BacktestStatistics::compute(&trades, &equity_curve, options.initial_capital);

    Ok(BacktestResult {
        trades,
        statistics,
        equity_curve,
        final_equity,
    })
}
