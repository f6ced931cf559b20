//! Strategy boundary — the stateful processor the engine calls once per bar.
//!
//! A strategy is an explicit struct carrying its own state (indicator
//! buffers, last-seen values) behind a single `on_bar` method. The engine
//! calls it exactly once per bar, in order, before evaluating the position
//! state machine for that bar. A strategy failure aborts the run and
//! propagates unmodified to the entry-point caller; the engine never
//! catches or retries it.

use thiserror::Error;

use crate::domain::{NormalizedBar, StrategySignal};

/// Error raised by a strategy processor. Transparent wrapper so the
/// underlying error surfaces unchanged at the entry point.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StrategyError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>);

impl StrategyError {
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(msg.into().into())
    }
}

/// A signal-producing processor fed one bar at a time.
pub trait Strategy {
    fn name(&self) -> &str;

    fn on_bar(&mut self, bar: &NormalizedBar) -> Result<StrategySignal, StrategyError>;
}

impl<T: Strategy + ?Sized> Strategy for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_bar(&mut self, bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        (**self).on_bar(bar)
    }
}
