//! Buy-and-hold — long on the first bar, then hold forever.

use tapelab_core::{NormalizedBar, Strategy, StrategyError, StrategySignal};

#[derive(Debug, Clone, Default)]
pub struct BuyAndHold {
    entered: bool,
}

impl BuyAndHold {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy_and_hold"
    }

    fn on_bar(&mut self, _bar: &NormalizedBar) -> Result<StrategySignal, StrategyError> {
        if self.entered {
            return Ok(StrategySignal::hold());
        }
        self.entered = true;
        Ok(StrategySignal::long().with_reason("initial entry"))
    }
}
