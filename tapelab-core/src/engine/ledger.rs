//! Trade/equity ledger — realized capital, the trade tape, and the
//! per-bar total-equity curve.

use crate::decimal::FixedDecimal;
use crate::domain::{NormalizedBar, Position, Trade};

/// Accumulates the results of one backtest run.
///
/// `equity` is realized capital only; the curve records total equity
/// (realized plus the open position's mark-to-market PnL) with exactly
/// one entry per input bar.
#[derive(Debug, Clone)]
pub struct Ledger {
    equity: FixedDecimal,
    trades: Vec<Trade>,
    equity_curve: Vec<FixedDecimal>,
}

/// Per-bar equity figures produced by [`Ledger::record_bar`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct BarEquity {
    pub equity: FixedDecimal,
    pub unrealized_pnl: FixedDecimal,
    pub total_equity: FixedDecimal,
}

impl Ledger {
    pub fn new(initial_capital: FixedDecimal) -> Self {
        Self {
            equity: initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Fold one state-machine step into the ledger and record this bar's
    /// equity-curve entry.
    pub(crate) fn record_bar(
        &mut self,
        closed_trade: Option<&Trade>,
        position: Option<&Position>,
        bar: &NormalizedBar,
    ) -> BarEquity {
        if let Some(trade) = closed_trade {
            self.equity += trade.pnl;
            self.trades.push(trade.clone());
        }
        let unrealized_pnl = position
            .map(|p| p.unrealized_pnl(bar.close))
            .unwrap_or(FixedDecimal::ZERO);
        let total_equity = self.equity + unrealized_pnl;
        self.equity_curve.push(total_equity);
        BarEquity {
            equity: self.equity,
            unrealized_pnl,
            total_equity,
        }
    }

    /// Apply an end-of-data force close: credit the trade and overwrite
    /// the final curve entry with final realized equity, so the curve
    /// always ends at `final_equity`.
    pub(crate) fn record_forced_close(&mut self, trade: Trade) {
        self.equity += trade.pnl;
        self.trades.push(trade);
        if let Some(last) = self.equity_curve.last_mut() {
            *last = self.equity;
        }
    }

    /// Realized equity, excluding any open position's unrealized PnL.
    pub fn equity(&self) -> FixedDecimal {
        self.equity
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[FixedDecimal] {
        &self.equity_curve
    }

    pub(crate) fn into_parts(self) -> (Vec<Trade>, Vec<FixedDecimal>, FixedDecimal) {
        (self.trades, self.equity_curve, self.equity)
    }
}
