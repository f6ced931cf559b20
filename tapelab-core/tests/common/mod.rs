//! Shared helpers for integration tests.
#![allow(dead_code)]

use tapelab_core::{
    FixedDecimal, NormalizedBar, SignalAction, Strategy, StrategyError, StrategySignal,
};

pub fn fd(s: &str) -> FixedDecimal {
    s.parse().unwrap()
}

pub fn bar(close: &str) -> NormalizedBar {
    let c = fd(close);
    NormalizedBar::new(c, c, c, c, fd("1000"))
}

pub fn bars(closes: &[&str]) -> Vec<NormalizedBar> {
    closes.iter().map(|c| bar(c)).collect()
}

pub fn bar_from_f64(close: f64) -> NormalizedBar {
    // A little intrabar range so stop/take-profit levels can trigger.
    NormalizedBar::from_f64(close, close * 1.01, close * 0.99, close, 1_000.0).unwrap()
}

pub fn bars_from_f64(closes: &[f64]) -> Vec<NormalizedBar> {
    closes.iter().map(|c| bar_from_f64(*c)).collect()
}

/// Emits the same action on every bar.
pub struct Always(pub SignalAction);

impl Strategy for Always {
    fn name(&self) -> &str {
        "always"
    }

    fn on_bar(&mut self, _bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        Ok(StrategySignal::new(self.0))
    }
}

/// Replays a fixed list of signals, then holds.
pub struct Scripted {
    signals: Vec<StrategySignal>,
    cursor: usize,
}

impl Scripted {
    pub fn new(signals: Vec<StrategySignal>) -> Self {
        Self { signals, cursor: 0 }
    }
}

impl Strategy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn on_bar(&mut self, _bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        let signal = self
            .signals
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(StrategySignal::hold);
        self.cursor += 1;
        Ok(signal)
    }
}

/// Maps a script of opcodes to signals derived from the current bar, so a
/// `(codes, bars)` pair fully determines the run. Codes 4 and 5 attach
/// protective levels around the signal close to exercise the triggers.
pub struct Coded {
    codes: Vec<u8>,
    cursor: usize,
}

impl Coded {
    pub fn new(codes: Vec<u8>) -> Self {
        Self { codes, cursor: 0 }
    }
}

impl Strategy for Coded {
    fn name(&self) -> &str {
        "coded"
    }

    fn on_bar(&mut self, bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        let code = self.codes.get(self.cursor).copied().unwrap_or(3);
        self.cursor += 1;
        let signal = match code % 6 {
            0 => StrategySignal::long(),
            1 => StrategySignal::short(),
            2 => StrategySignal::close(),
            3 => StrategySignal::hold(),
            4 => StrategySignal::long()
                .with_stop_loss(bar.close * fd("0.97"))
                .with_take_profit(bar.close * fd("1.03")),
            _ => StrategySignal::short()
                .with_stop_loss(bar.close * fd("1.03"))
                .with_take_profit(bar.close * fd("0.97")),
        };
        Ok(signal)
    }
}
