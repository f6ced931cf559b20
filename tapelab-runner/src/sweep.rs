//! Parameter sweep — grid generation plus parallel execution.
//!
//! Independent backtest runs share no mutable state, so a sweep is a
//! plain rayon `par_iter` over configs.

use rayon::prelude::*;

use tapelab_core::NormalizedBar;

use crate::config::{RunConfig, StrategyConfig};
use crate::runner::{run, RunError, RunReport};

/// Grid of MA crossover parameters to sweep over.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub fast_periods: Vec<usize>,
    pub slow_periods: Vec<usize>,
}

impl ParamGrid {
    /// A small default grid for MA crossover exploration.
    pub fn ma_crossover_default() -> Self {
        Self {
            fast_periods: vec![5, 10, 20],
            slow_periods: vec![50, 100, 200],
        }
    }

    /// Upper bound on grid size (invalid fast/slow pairs are skipped).
    pub fn size(&self) -> usize {
        self.fast_periods.len() * self.slow_periods.len()
    }

    /// All valid configurations, inheriting everything but the strategy
    /// parameters from `base`.
    pub fn generate_configs(&self, base: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::new();
        for &fast in &self.fast_periods {
            for &slow in &self.slow_periods {
                if fast >= slow {
                    continue;
                }
                let mut config = base.clone();
                config.strategy = StrategyConfig::MaCrossover {
                    fast_period: fast,
                    slow_period: slow,
                };
                configs.push(config);
            }
        }
        configs
    }
}

/// Run every config over the same bars, in parallel. Result order matches
/// config order.
pub fn run_sweep(
    configs: &[RunConfig],
    bars: &[NormalizedBar],
) -> Vec<Result<RunReport, RunError>> {
    configs.par_iter().map(|config| run(config, bars)).collect()
}
