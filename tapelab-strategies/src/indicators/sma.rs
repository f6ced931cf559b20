//! Simple Moving Average (SMA).
//!
//! Rolling mean over a fixed window. First value after `period` inputs.

use std::collections::VecDeque;

use tapelab_core::FixedDecimal;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    divisor: FixedDecimal,
    window: VecDeque<FixedDecimal>,
    sum: FixedDecimal,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            divisor: FixedDecimal::from_i64(period as i64),
            window: VecDeque::with_capacity(period + 1),
            sum: FixedDecimal::ZERO,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, value: FixedDecimal) -> Option<FixedDecimal> {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        if self.window.len() == self.period {
            self.sum.checked_div(self.divisor).ok()
        } else {
            None
        }
    }
}
