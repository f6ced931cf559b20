//! Single-run orchestration — config in, executed report out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tapelab_core::{run_backtest, BacktestError, BacktestResult, NormalizedBar};

use crate::config::{RunConfig, RunId};
use crate::factory::{build_strategy, FactoryError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("factory error: {0}")]
    Factory(#[from] FactoryError),
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
}

/// Complete, serializable result of one configured run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub config: RunConfig,
    pub result: BacktestResult,
}

/// Build the configured strategy and run it over `bars`.
pub fn run(config: &RunConfig, bars: &[NormalizedBar]) -> Result<RunReport, RunError> {
    let mut strategy = build_strategy(&config.strategy)?;
    let options = config.backtest.to_options();
    let result = run_backtest(strategy.as_mut(), bars, &options)?;
    Ok(RunReport {
        run_id: config.run_id(),
        config: config.clone(),
        result,
    })
}
