//! RSI mean-reversion strategy — buy oversold, exit overbought.

use tapelab_core::{FixedDecimal, NormalizedBar, Strategy, StrategyError, StrategySignal};

use crate::indicators::Rsi;

#[derive(Debug, Clone)]
pub struct RsiReversal {
    rsi: Rsi,
    oversold: FixedDecimal,
    overbought: FixedDecimal,
}

impl RsiReversal {
    pub fn new(period: usize, oversold: FixedDecimal, overbought: FixedDecimal) -> Self {
        assert!(oversold < overbought, "oversold must be below overbought");
        Self {
            rsi: Rsi::new(period),
            oversold,
            overbought,
        }
    }

    pub fn default_params() -> Self {
        Self::new(14, FixedDecimal::from_i64(30), FixedDecimal::from_i64(70))
    }
}

impl Strategy for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn on_bar(&mut self, bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        let signal = match self.rsi.update(bar.close) {
            Some(value) if value <= self.oversold => {
                StrategySignal::long().with_reason("oversold")
            }
            Some(value) if value >= self.overbought => {
                StrategySignal::close().with_reason("overbought")
            }
            _ => StrategySignal::hold(),
        };
        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapelab_core::SignalAction;

    fn fd(s: &str) -> FixedDecimal {
        s.parse().unwrap()
    }

    fn bar(close: &str) -> NormalizedBar {
        let c = fd(close);
        NormalizedBar::new(c, c, c, c, fd("1000"))
    }

    #[test]
    fn goes_long_when_oversold() {
        let mut strategy = RsiReversal::new(2, fd("30"), fd("70"));
        // Straight decline pins RSI at 0, well under the oversold line.
        let mut actions = Vec::new();
        for close in ["100", "98", "96", "94"] {
            actions.push(strategy.on_bar(&bar(close)).unwrap().action);
        }
        assert_eq!(actions[3], SignalAction::Long);
    }

    #[test]
    fn closes_when_overbought() {
        let mut strategy = RsiReversal::new(2, fd("30"), fd("70"));
        let mut last = SignalAction::Hold;
        for close in ["100", "102", "104", "106"] {
            last = strategy.on_bar(&bar(close)).unwrap().action;
        }
        assert_eq!(last, SignalAction::Close);
    }

    #[test]
    fn holds_in_the_neutral_band() {
        let mut strategy = RsiReversal::new(2, fd("10"), fd("90"));
        // Alternating equal gains and losses keep RSI mid-range
        // (50, 75, 37.5, ... for this series).
        let mut actions = Vec::new();
        for close in ["100", "110", "100", "110", "100"] {
            actions.push(strategy.on_bar(&bar(close)).unwrap().action);
        }
        assert!(actions.iter().all(|a| *a == SignalAction::Hold));
    }

    #[test]
    #[should_panic(expected = "oversold must be below overbought")]
    fn rejects_inverted_bands() {
        RsiReversal::new(14, fd("70"), fd("30"));
    }
}
