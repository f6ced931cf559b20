//! Shared per-bar engine state driven by both execution modes.

use thiserror::Error;

use crate::decimal::FixedDecimal;
use crate::domain::{BacktestSnapshot, NormalizedBar, Position};
use crate::engine::ledger::Ledger;
use crate::engine::options::{BacktestOptions, ConfigError};
use crate::engine::update::update_position;
use crate::strategy::{Strategy, StrategyError};

/// Failures surfaced by the execution drivers.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// A strategy processor failed; propagated unmodified, never retried.
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
}

/// One backtest run's mutable state: the current position slot, the
/// ledger, and the bar cursor. Batch and streaming both advance through
/// [`EngineState::step`], which is what makes their outputs identical.
pub(crate) struct EngineState {
    options: BacktestOptions,
    position: Option<Position>,
    ledger: Ledger,
    index: usize,
}

impl EngineState {
    /// Validates options eagerly; no failure mode exists after this point
    /// other than a strategy error.
    pub fn new(options: BacktestOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let ledger = Ledger::new(options.initial_capital);
        Ok(Self {
            options,
            position: None,
            ledger,
            index: 0,
        })
    }

    /// Process one bar: ask the strategy, advance the state machine, fold
    /// the outcome into the ledger.
    pub fn step(
        &mut self,
        strategy: &mut dyn Strategy,
        bar: &NormalizedBar,
    ) -> Result<BacktestSnapshot, BacktestError> {
        let signal = strategy.on_bar(bar)?;
        let update = update_position(
            self.position.take(),
            &signal,
            bar,
            self.index,
            self.ledger.equity(),
            &self.options,
        );
        self.position = update.position;
        let figures =
            self.ledger
                .record_bar(update.closed_trade.as_ref(), self.position.as_ref(), bar);
        let snapshot = BacktestSnapshot {
            index: self.index,
            bar: bar.clone(),
            signal,
            position: self.position.clone(),
            equity: figures.equity,
            unrealized_pnl: figures.unrealized_pnl,
            total_equity: figures.total_equity,
            closed_trade: update.closed_trade,
        };
        self.index += 1;
        Ok(snapshot)
    }

    pub fn options(&self) -> &BacktestOptions {
        &self.options
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn take_position(&mut self) -> Option<Position> {
        self.position.take()
    }

    pub fn equity(&self) -> FixedDecimal {
        self.ledger.equity()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }
}
