//! Streaming execution driver — pull-based, one snapshot per bar.
//!
//! Wraps a bar source (any iterator, including one draining a channel fed
//! by another thread) and yields a [`BacktestSnapshot`] per bar as it
//! becomes available. The only suspension point is the source's `next`;
//! snapshot *i* is always emitted before bar *i + 1* is requested.
//!
//! Unlike the batch driver, end of input does not force-close an open
//! position — whether a dangling position is meaningful is the caller's
//! decision.

use crate::decimal::FixedDecimal;
use crate::domain::{BacktestSnapshot, NormalizedBar, Position, Trade};
use crate::engine::options::{BacktestOptions, ConfigError};
use crate::engine::state::{BacktestError, EngineState};
use crate::strategy::Strategy;

/// Lazy per-bar backtest over a pull-based bar source.
///
/// Restartable only by constructing a new stream with a fresh source; a
/// strategy error is yielded once, after which the stream is fused.
pub struct BacktestStream<S, I> {
    strategy: S,
    source: I,
    state: EngineState,
    failed: bool,
}

impl<S, I> BacktestStream<S, I>
where
    S: Strategy,
    I: Iterator<Item = NormalizedBar>,
{
    /// Options are validated here, before the first bar is pulled.
    pub fn new<T>(strategy: S, source: T, options: &BacktestOptions) -> Result<Self, ConfigError>
    where
        T: IntoIterator<Item = NormalizedBar, IntoIter = I>,
    {
        Ok(Self {
            strategy,
            source: source.into_iter(),
            state: EngineState::new(options.clone())?,
            failed: false,
        })
    }

    /// The still-open position, if any.
    pub fn position(&self) -> Option<&Position> {
        self.state.position()
    }

    /// Realized equity so far.
    pub fn equity(&self) -> FixedDecimal {
        self.state.equity()
    }

    pub fn trades(&self) -> &[Trade] {
        self.state.ledger().trades()
    }

    /// Total equity per processed bar.
    pub fn equity_curve(&self) -> &[FixedDecimal] {
        self.state.ledger().equity_curve()
    }
}

impl<S, I> Iterator for BacktestStream<S, I>
where
    S: Strategy,
    I: Iterator<Item = NormalizedBar>,
{
    type Item = Result<BacktestSnapshot, BacktestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let bar = self.source.next()?;
        match self.state.step(&mut self.strategy, &bar) {
            Ok(snapshot) => Some(Ok(snapshot)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
