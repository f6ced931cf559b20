//! Incremental indicator processors.
//!
//! Each indicator owns its rolling state and is fed one value per bar;
//! `update` returns `None` until the warmup window is full.

mod ema;
mod rsi;
mod sma;

pub use ema::Ema;
pub use rsi::Rsi;
pub use sma::Sma;
