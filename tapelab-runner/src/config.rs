//! Serializable backtest configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tapelab_core::{BacktestOptions, FixedDecimal};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Serializable configuration for a single backtest run.
///
/// Captures everything needed to reproduce a run: the strategy and its
/// parameters plus the engine options. Two identical configs hash to the
/// same [`RunId`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub backtest: BacktestParams,
}

impl RunConfig {
    /// Deterministic content hash of this configuration.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(text)?)
    }
}

/// Errors from reading a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Strategy selection and parameters (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    /// Long on the first bar, hold to the end.
    BuyAndHold,

    /// SMA crossover: long on golden cross, short on death cross.
    MaCrossover {
        fast_period: usize,
        slow_period: usize,
    },

    /// RSI mean reversion: long below `oversold`, exit above `overbought`.
    RsiReversal {
        period: usize,
        oversold: FixedDecimal,
        overbought: FixedDecimal,
    },
}

/// Engine options in config form, mirroring [`BacktestOptions`] defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestParams {
    #[serde(default = "default_initial_capital")]
    pub initial_capital: FixedDecimal,
    #[serde(default)]
    pub commission_rate: FixedDecimal,
    #[serde(default)]
    pub slippage_rate: FixedDecimal,
    #[serde(default = "default_allow_short")]
    pub allow_short: bool,
}

fn default_initial_capital() -> FixedDecimal {
    FixedDecimal::from_i64(10_000)
}

fn default_allow_short() -> bool {
    true
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            commission_rate: FixedDecimal::ZERO,
            slippage_rate: FixedDecimal::ZERO,
            allow_short: true,
        }
    }
}

impl BacktestParams {
    pub fn to_options(&self) -> BacktestOptions {
        BacktestOptions::new()
            .with_initial_capital(self.initial_capital)
            .with_commission_rate(self.commission_rate)
            .with_slippage_rate(self.slippage_rate)
            .with_allow_short(self.allow_short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fd(s: &str) -> FixedDecimal {
        s.parse().unwrap()
    }

    fn ma_config() -> RunConfig {
        RunConfig {
            strategy: StrategyConfig::MaCrossover {
                fast_period: 10,
                slow_period: 50,
            },
            backtest: BacktestParams::default(),
        }
    }

    #[test]
    fn run_id_is_deterministic() {
        let config = ma_config();
        assert_eq!(config.run_id(), config.run_id());
        assert!(!config.run_id().is_empty());
    }

    #[test]
    fn run_id_changes_with_params() {
        let config = ma_config();
        let mut other = config.clone();
        other.strategy = StrategyConfig::MaCrossover {
            fast_period: 20,
            slow_period: 50,
        };
        assert_ne!(config.run_id(), other.run_id());
    }

    #[test]
    fn config_json_roundtrip() {
        let config = RunConfig {
            strategy: StrategyConfig::RsiReversal {
                period: 14,
                oversold: fd("30"),
                overbought: fd("70"),
            },
            backtest: BacktestParams {
                initial_capital: fd("50000"),
                commission_rate: fd("0.001"),
                slippage_rate: FixedDecimal::ZERO,
                allow_short: false,
            },
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deser: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deser);
    }

    #[test]
    fn parses_toml_with_defaults() {
        let toml_text = r#"
            [strategy]
            type = "MA_CROSSOVER"
            fast_period = 10
            slow_period = 50
        "#;
        let config = RunConfig::from_toml_str(toml_text).unwrap();
        assert_eq!(
            config.strategy,
            StrategyConfig::MaCrossover {
                fast_period: 10,
                slow_period: 50,
            }
        );
        assert_eq!(config.backtest.initial_capital, fd("10000"));
        assert!(config.backtest.allow_short);
    }

    #[test]
    fn parses_full_toml() {
        let toml_text = r#"
            [strategy]
            type = "BUY_AND_HOLD"

            [backtest]
            initial_capital = 25000
            commission_rate = 0.001
            slippage_rate = 0.0005
            allow_short = false
        "#;
        let config = RunConfig::from_toml_str(toml_text).unwrap();
        assert_eq!(config.strategy, StrategyConfig::BuyAndHold);
        assert_eq!(config.backtest.initial_capital, fd("25000"));
        assert_eq!(config.backtest.commission_rate, fd("0.001"));
        assert_eq!(config.backtest.slippage_rate, fd("0.0005"));
        assert!(!config.backtest.allow_short);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(RunConfig::from_toml_str("strategy = 12").is_err());
    }

    #[test]
    fn params_convert_to_engine_options() {
        let params = BacktestParams {
            initial_capital: fd("25000"),
            commission_rate: fd("0.001"),
            slippage_rate: fd("0.0005"),
            allow_short: false,
        };
        let options = params.to_options();
        assert_eq!(options.initial_capital, fd("25000"));
        assert_eq!(options.commission_rate, fd("0.001"));
        assert!(!options.allow_short);
        assert!(options.validate().is_ok());
    }
}
