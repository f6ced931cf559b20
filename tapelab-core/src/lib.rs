//! TapeLab Core — deterministic backtest execution engine.
//!
//! This crate contains the heart of the backtester:
//! - Fixed-point decimal money math (exact, 18 fractional digits)
//! - Domain types (bars, signals, positions, trades, snapshots)
//! - Bar normalization from heterogeneous numeric-ish input
//! - The pure position state machine (entry/exit/reversal/stop logic)
//! - Trade/equity ledger and the per-bar equity curve
//! - Batch and streaming execution drivers with identical semantics
//! - The statistics engine (win rate, drawdown, Sharpe/Sortino, streaks)
//!
//! Strategies live outside this crate behind the [`strategy::Strategy`]
//! trait: stateful processors the drivers call exactly once per bar.

pub mod decimal;
pub mod domain;
pub mod engine;
pub mod metrics;
pub mod normalize;
pub mod strategy;

pub use decimal::{DecimalError, FixedDecimal};
pub use domain::{
    BacktestSnapshot, ExitReason, NormalizedBar, Position, PositionSide, SignalAction,
    StrategySignal, Trade,
};
pub use engine::{
    run_backtest, BacktestError, BacktestOptions, BacktestResult, BacktestStream, ConfigError,
};
pub use metrics::BacktestStatistics;
pub use normalize::{normalize_bar, NormalizeError, NumericField, RawBar};
pub use strategy::{Strategy, StrategyError};
