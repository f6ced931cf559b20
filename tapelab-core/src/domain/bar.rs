//! NormalizedBar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{DecimalError, FixedDecimal};

/// OHLCV bar at the engine scale, immutable once normalized.
///
/// One bar per discrete time interval; the position of a bar in its input
/// sequence is the authoritative chronological order. The timestamp is
/// carried through unmodified when the source provides one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedBar {
    pub open: FixedDecimal,
    pub high: FixedDecimal,
    pub low: FixedDecimal,
    pub close: FixedDecimal,
    pub volume: FixedDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NormalizedBar {
    pub fn new(
        open: FixedDecimal,
        high: FixedDecimal,
        low: FixedDecimal,
        close: FixedDecimal,
        volume: FixedDecimal,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp: None,
        }
    }

    /// Convenience float-boundary constructor for in-memory callers.
    pub fn from_f64(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, DecimalError> {
        Ok(Self::new(
            FixedDecimal::from_f64(open)?,
            FixedDecimal::from_f64(high)?,
            FixedDecimal::from_f64(low)?,
            FixedDecimal::from_f64(close)?,
            FixedDecimal::from_f64(volume)?,
        ))
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Basic OHLC sanity check: high >= low, range contains open and close.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open.is_sign_positive()
            && self.close.is_sign_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> NormalizedBar {
        NormalizedBar::from_f64(100.0, 105.0, 98.0, 103.0, 50_000.0).unwrap()
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = "97".parse().unwrap(); // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn from_f64_rejects_nan() {
        assert!(NormalizedBar::from_f64(f64::NAN, 105.0, 98.0, 103.0, 0.0).is_err());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar().with_timestamp("2024-01-02T00:00:00Z".parse().unwrap());
        let json = serde_json::to_string(&bar).unwrap();
        let deser: NormalizedBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
