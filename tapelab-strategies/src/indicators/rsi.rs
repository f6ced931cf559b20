//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! First value after `period` closes-over-closes changes. An average loss
//! of zero pins RSI at 100 rather than dividing by zero.

use tapelab_core::FixedDecimal;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    divisor: FixedDecimal,
    prev_close: Option<FixedDecimal>,
    avg_gain: FixedDecimal,
    avg_loss: FixedDecimal,
    /// Number of changes folded in so far.
    observed: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            divisor: FixedDecimal::from_i64(period as i64),
            prev_close: None,
            avg_gain: FixedDecimal::ZERO,
            avg_loss: FixedDecimal::ZERO,
            observed: 0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, close: FixedDecimal) -> Option<FixedDecimal> {
        let prev = match self.prev_close.replace(close) {
            Some(prev) => prev,
            None => return None,
        };
        let change = close - prev;
        let gain = change.max(FixedDecimal::ZERO);
        let loss = (-change).max(FixedDecimal::ZERO);
        self.observed += 1;

        if self.observed < self.period {
            // Still accumulating the seed window as raw sums.
            self.avg_gain += gain;
            self.avg_loss += loss;
            return None;
        }

        if self.observed == self.period {
            self.avg_gain = (self.avg_gain + gain).checked_div(self.divisor).ok()?;
            self.avg_loss = (self.avg_loss + loss).checked_div(self.divisor).ok()?;
        } else {
            let carry = FixedDecimal::from_i64(self.period as i64 - 1);
            self.avg_gain = (self.avg_gain * carry + gain).checked_div(self.divisor).ok()?;
            self.avg_loss = (self.avg_loss * carry + loss).checked_div(self.divisor).ok()?;
        }

        if self.avg_loss.is_zero() {
            return Some(FixedDecimal::HUNDRED);
        }
        let rs = self.avg_gain.checked_div(self.avg_loss).ok()?;
        let rsi = FixedDecimal::HUNDRED
            - FixedDecimal::HUNDRED
                .checked_div(FixedDecimal::ONE + rs)
                .ok()?;
        Some(rsi)
    }
}
