//! Strategy factory — build a boxed strategy from its config.

use thiserror::Error;

use tapelab_core::Strategy;
use tapelab_strategies::{BuyAndHold, MaCrossover, MaType, RsiReversal};

use crate::config::StrategyConfig;

/// Invalid strategy parameters, reported instead of panicking in the
/// concrete constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactoryError {
    #[error("invalid {strategy} parameters: {reason}")]
    InvalidParams {
        strategy: &'static str,
        reason: String,
    },
}

/// Build the configured strategy.
pub fn build_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy>, FactoryError> {
    match config {
        StrategyConfig::BuyAndHold => Ok(Box::new(BuyAndHold::new())),
        StrategyConfig::MaCrossover {
            fast_period,
            slow_period,
        } => {
            if *fast_period < 1 {
                return Err(FactoryError::InvalidParams {
                    strategy: "ma_crossover",
                    reason: "fast_period must be >= 1".into(),
                });
            }
            if slow_period <= fast_period {
                return Err(FactoryError::InvalidParams {
                    strategy: "ma_crossover",
                    reason: format!(
                        "slow_period ({slow_period}) must be > fast_period ({fast_period})"
                    ),
                });
            }
            Ok(Box::new(MaCrossover::new(
                *fast_period,
                *slow_period,
                MaType::Sma,
            )))
        }
        StrategyConfig::RsiReversal {
            period,
            oversold,
            overbought,
        } => {
            if *period < 1 {
                return Err(FactoryError::InvalidParams {
                    strategy: "rsi_reversal",
                    reason: "period must be >= 1".into(),
                });
            }
            if oversold >= overbought {
                return Err(FactoryError::InvalidParams {
                    strategy: "rsi_reversal",
                    reason: format!(
                        "oversold ({oversold}) must be below overbought ({overbought})"
                    ),
                });
            }
            Ok(Box::new(RsiReversal::new(*period, *oversold, *overbought)))
        }
    }
}
