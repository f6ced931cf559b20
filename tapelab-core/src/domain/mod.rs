//! Domain types for the TapeLab engine.

pub mod bar;
pub mod position;
pub mod signal;
pub mod snapshot;
pub mod trade;

pub use bar::NormalizedBar;
pub use position::{Position, PositionSide};
pub use signal::{SignalAction, StrategySignal};
pub use snapshot::BacktestSnapshot;
pub use trade::{ExitReason, Trade};
