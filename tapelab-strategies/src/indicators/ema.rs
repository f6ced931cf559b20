//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the first `period` values, then smoothed with
//! multiplier `2 / (period + 1)`.

use tapelab_core::FixedDecimal;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: FixedDecimal,
    seed_sum: FixedDecimal,
    seed_count: usize,
    current: Option<FixedDecimal>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        let multiplier = FixedDecimal::from_i64(2)
            .checked_div(FixedDecimal::from_i64(period as i64 + 1))
            .expect("period + 1 is positive");
        Self {
            period,
            multiplier,
            seed_sum: FixedDecimal::ZERO,
            seed_count: 0,
            current: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, value: FixedDecimal) -> Option<FixedDecimal> {
        match self.current {
            Some(prev) => {
                let next = (value - prev) * self.multiplier + prev;
                self.current = Some(next);
                Some(next)
            }
            None => {
                self.seed_sum += value;
                self.seed_count += 1;
                if self.seed_count == self.period {
                    let seed = self
                        .seed_sum
                        .checked_div(FixedDecimal::from_i64(self.period as i64))
                        .ok()?;
                    self.current = Some(seed);
                    Some(seed)
                } else {
                    None
                }
            }
        }
    }
}
