//! TapeLab Strategies — incremental indicators and signal strategies.
//!
//! Every processor here is an explicit struct carrying its own state:
//! indicators consume one value per bar and stay silent until warm;
//! strategies implement [`tapelab_core::Strategy`] and emit one
//! [`tapelab_core::StrategySignal`] per bar.

pub mod buy_hold;
pub mod indicators;
pub mod ma_crossover;
pub mod rsi_reversal;

pub use buy_hold::BuyAndHold;
pub use ma_crossover::{MaCrossover, MaType};
pub use rsi_reversal::RsiReversal;
