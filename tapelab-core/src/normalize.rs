//! Bar normalization — heterogeneous numeric-ish input into the engine scale.
//!
//! Upstream sources hand bars over as plain floats, decimal strings, or
//! already-fixed values, often mixed within one payload. Normalization is
//! a total, side-effect-free conversion of each field into
//! [`FixedDecimal`]; an optional timestamp passes through unmodified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::FixedDecimal;
use crate::domain::NormalizedBar;

/// One numeric-ish bar field, prior to normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Fixed(FixedDecimal),
    Float(f64),
    Text(String),
}

impl From<FixedDecimal> for NumericField {
    fn from(value: FixedDecimal) -> Self {
        Self::Fixed(value)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        Self::Fixed(FixedDecimal::from_i64(value))
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumericField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Errors from normalizing a single bar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("bar field `{field}` is not a finite number: {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("bar field `{field}` is not a valid decimal: {value:?}")]
    Unparseable { field: &'static str, value: String },
}

/// A bar as received from an upstream source, fields still heterogeneous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub open: NumericField,
    pub high: NumericField,
    pub low: NumericField,
    pub close: NumericField,
    pub volume: NumericField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<RawBar> for NormalizedBar {
    type Error = NormalizeError;

    fn try_from(raw: RawBar) -> Result<Self, Self::Error> {
        Ok(NormalizedBar {
            open: normalize_field("open", &raw.open)?,
            high: normalize_field("high", &raw.high)?,
            low: normalize_field("low", &raw.low)?,
            close: normalize_field("close", &raw.close)?,
            volume: normalize_field("volume", &raw.volume)?,
            timestamp: raw.timestamp,
        })
    }
}

/// Normalize one raw bar into the engine representation.
pub fn normalize_bar(raw: RawBar) -> Result<NormalizedBar, NormalizeError> {
    NormalizedBar::try_from(raw)
}

fn normalize_field(
    field: &'static str,
    value: &NumericField,
) -> Result<FixedDecimal, NormalizeError> {
    match value {
        NumericField::Fixed(v) => Ok(*v),
        NumericField::Float(v) => {
            FixedDecimal::from_f64(*v).map_err(|_| NormalizeError::NonFinite { field, value: *v })
        }
        NumericField::Text(s) => s.parse().map_err(|_| NormalizeError::Unparseable {
            field,
            value: s.clone(),
        }),
    }
}
