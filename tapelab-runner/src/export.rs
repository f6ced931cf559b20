//! Run artifact export — trade tape and equity curve as CSV, full report
//! as JSON.

use anyhow::{Context, Result};
use std::path::Path;

use tapelab_core::{FixedDecimal, Trade};

use crate::runner::RunReport;

/// Write the trade tape to a CSV file.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writer.write_record([
        "side",
        "entry_index",
        "exit_index",
        "entry_price",
        "exit_price",
        "quantity",
        "size",
        "pnl",
        "return_rate",
        "exit_reason",
    ])?;

    for trade in trades {
        writer.write_record([
            trade.side.as_str().to_string(),
            trade.entry_index.to_string(),
            trade.exit_index.to_string(),
            trade.entry_price.to_string(),
            trade.exit_price.to_string(),
            trade.quantity.to_string(),
            trade.size.to_string(),
            trade.pnl.to_string(),
            trade.return_rate.to_string(),
            trade.exit_reason.as_str().to_string(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush trades CSV {}", path.display()))?;
    Ok(())
}

/// Write the per-bar total-equity curve to a CSV file.
pub fn write_equity_csv(path: &Path, equity_curve: &[FixedDecimal]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;

    writer.write_record(["bar", "total_equity"])?;
    for (index, equity) in equity_curve.iter().enumerate() {
        writer.write_record([index.to_string(), equity.to_string()])?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush equity CSV {}", path.display()))?;
    Ok(())
}

/// Write the full run report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report JSON {}", path.display()))?;
    Ok(())
}
