//! Moving average crossover strategy — golden cross and death cross.
//!
//! Goes long when the fast MA crosses above the slow MA and short when it
//! crosses below. Optional protective levels are attached to each entry
//! signal as a percentage of the signal bar's close.

use tapelab_core::{FixedDecimal, NormalizedBar, Strategy, StrategyError, StrategySignal};

use crate::indicators::{Ema, Sma};

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

#[derive(Debug, Clone)]
enum Ma {
    Sma(Sma),
    Ema(Ema),
}

impl Ma {
    fn update(&mut self, value: FixedDecimal) -> Option<FixedDecimal> {
        match self {
            Ma::Sma(ma) => ma.update(value),
            Ma::Ema(ma) => ma.update(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast: Ma,
    slow: Ma,
    prev: Option<(FixedDecimal, FixedDecimal)>,
    stop_loss_pct: Option<FixedDecimal>,
    take_profit_pct: Option<FixedDecimal>,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize, ma_type: MaType) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );
        let (fast, slow) = match ma_type {
            MaType::Sma => (Ma::Sma(Sma::new(fast_period)), Ma::Sma(Sma::new(slow_period))),
            MaType::Ema => (Ma::Ema(Ema::new(fast_period)), Ma::Ema(Ema::new(slow_period))),
        };
        Self {
            fast,
            slow,
            prev: None,
            stop_loss_pct: None,
            take_profit_pct: None,
        }
    }

    pub fn default_params() -> Self {
        Self::new(10, 50, MaType::Sma)
    }

    /// Attach a stop-loss this far below (long) or above (short) the
    /// entry signal's close, as a fraction.
    pub fn with_stop_loss_pct(mut self, pct: FixedDecimal) -> Self {
        self.stop_loss_pct = Some(pct);
        self
    }

    pub fn with_take_profit_pct(mut self, pct: FixedDecimal) -> Self {
        self.take_profit_pct = Some(pct);
        self
    }

    fn entry(&self, mut signal: StrategySignal, close: FixedDecimal, long: bool) -> StrategySignal {
        if let Some(pct) = self.stop_loss_pct {
            let level = if long {
                close * (FixedDecimal::ONE - pct)
            } else {
                close * (FixedDecimal::ONE + pct)
            };
            signal = signal.with_stop_loss(level);
        }
        if let Some(pct) = self.take_profit_pct {
            let level = if long {
                close * (FixedDecimal::ONE + pct)
            } else {
                close * (FixedDecimal::ONE - pct)
            };
            signal = signal.with_take_profit(level);
        }
        signal
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn on_bar(&mut self, bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        let fast = self.fast.update(bar.close);
        let slow = self.slow.update(bar.close);
        let (Some(fast), Some(slow)) = (fast, slow) else {
            return Ok(StrategySignal::hold());
        };

        let signal = match self.prev.replace((fast, slow)) {
            // Golden cross: fast moves from at-or-below to above.
            Some((prev_fast, prev_slow)) if fast > slow && prev_fast <= prev_slow => self.entry(
                StrategySignal::long().with_reason("golden cross"),
                bar.close,
                true,
            ),
            // Death cross: fast moves from at-or-above to below.
            Some((prev_fast, prev_slow)) if fast < slow && prev_fast >= prev_slow => self.entry(
                StrategySignal::short().with_reason("death cross"),
                bar.close,
                false,
            ),
            _ => StrategySignal::hold(),
        };
        Ok(signal)
    }
}
