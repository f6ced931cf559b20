//! Performance statistics — pure functions over the trade tape and the
//! equity curve.
//!
//! Every metric is deterministic and does no I/O. Money math stays exact
//! in the ledger; statistics are the float output boundary — ratios here
//! may legitimately be `+∞` (profit factor with no losses), which a fixed
//! decimal cannot carry.

use serde::{Deserialize, Serialize};

use crate::decimal::FixedDecimal;
use crate::domain::Trade;

/// Annualization constant for Sharpe/Sortino. Fixed, not configurable:
/// the ratios assume daily bars.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate statistics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestStatistics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_pnl: f64,
    pub average_win: f64,
    pub average_loss: f64,
    /// Gross profit over gross loss; `+∞` with profits and no losses.
    #[serde(with = "ratio_serde")]
    pub profit_factor: f64,
    /// Average win over average loss, same zero/infinity rule.
    #[serde(with = "ratio_serde")]
    pub payoff_ratio: f64,
    pub total_return: f64,
    pub max_drawdown_amount: f64,
    /// Deepest drawdown as a fraction of the peak it fell from.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub total_bars: usize,
}

impl BacktestStatistics {
    /// Compute all statistics from the ledger output.
    pub fn compute(
        trades: &[Trade],
        equity_curve: &[FixedDecimal],
        initial_capital: FixedDecimal,
    ) -> Self {
        let curve: Vec<f64> = equity_curve.iter().map(|e| e.to_f64()).collect();

        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = trades.len() - winning_trades;
        let win_rate = if trades.is_empty() {
            0.0
        } else {
            winning_trades as f64 / trades.len() as f64
        };

        let gross_profit: f64 = trades
            .iter()
            .filter(|t| t.is_winner())
            .map(|t| t.pnl.to_f64())
            .sum();
        // Zero-PnL trades are losses; they contribute nothing to the sum.
        let gross_loss: f64 = trades
            .iter()
            .filter(|t| !t.is_winner())
            .map(|t| t.pnl.to_f64().abs())
            .sum();

        let average_win = if winning_trades > 0 {
            gross_profit / winning_trades as f64
        } else {
            0.0
        };
        let average_loss = if losing_trades > 0 {
            gross_loss / losing_trades as f64
        } else {
            0.0
        };

        let (max_drawdown_amount, max_drawdown) = max_drawdown(&curve);

        Self {
            total_trades: trades.len(),
            winning_trades,
            losing_trades,
            win_rate,
            gross_profit,
            gross_loss,
            net_pnl: gross_profit - gross_loss,
            average_win,
            average_loss,
            profit_factor: zero_guarded_ratio(gross_profit, gross_loss),
            payoff_ratio: zero_guarded_ratio(average_win, average_loss),
            total_return: total_return(&curve, initial_capital.to_f64()),
            max_drawdown_amount,
            max_drawdown,
            sharpe_ratio: sharpe_ratio(&curve),
            sortino_ratio: sortino_ratio(&curve),
            max_consecutive_wins: max_consecutive(trades, true),
            max_consecutive_losses: max_consecutive(trades, false),
            total_bars: equity_curve.len(),
        }
    }
}

/// JSON cannot carry `f64::INFINITY`; encode it as the string `"inf"` so
/// persisted reports roundtrip.
mod ratio_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(value),
            Raw::Text(text) if text == "inf" => Ok(f64::INFINITY),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "invalid ratio value: {text:?}"
            ))),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// `numerator / denominator`; `+∞` when the denominator is zero and the
/// numerator positive, else `0`.
fn zero_guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        if numerator > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        numerator / denominator
    }
}

/// Total return as a fraction of initial capital.
pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    match equity_curve.last() {
        Some(&final_equity) if initial_capital > 0.0 => {
            (final_equity - initial_capital) / initial_capital
        }
        _ => 0.0,
    }
}

/// Single forward pass: running peak, deepest drop below it.
///
/// Returns `(amount, fraction_of_peak_at_that_point)`; both `0` for a
/// monotonically non-decreasing curve.
pub fn max_drawdown(equity_curve: &[f64]) -> (f64, f64) {
    let Some(&first) = equity_curve.first() else {
        return (0.0, 0.0);
    };
    let mut peak = first;
    let mut max_amount = 0.0_f64;
    let mut max_fraction = 0.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        let drawdown = peak - equity;
        if drawdown > max_amount {
            max_amount = drawdown;
            max_fraction = if peak > 0.0 { drawdown / peak } else { 0.0 };
        }
    }
    (max_amount, max_fraction)
}

/// Annualized Sharpe ratio over per-step simple returns.
///
/// `mean(returns) / std(returns) × √252`; `0` when the deviation is zero
/// or the curve has fewer than 2 points.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = step_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualized Sortino ratio: downside deviation (RMS of `min(0, r)` over
/// all returns) in place of the standard deviation.
pub fn sortino_ratio(equity_curve: &[f64]) -> f64 {
    let returns = step_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let downside_var = returns
        .iter()
        .map(|r| r.min(0.0).powi(2))
        .sum::<f64>()
        / returns.len() as f64;
    let downside_std = downside_var.sqrt();
    if downside_std < 1e-15 {
        return 0.0;
    }
    (mean / downside_std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Per-step simple returns `(E[i] − E[i−1]) / E[i−1]`; a non-positive
/// predecessor contributes a zero return.
pub fn step_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 divisor).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Longest run of consecutive winners (or losers), in ledger order.
fn max_consecutive(trades: &[Trade], winners: bool) -> usize {
    let mut max_streak = 0;
    let mut current = 0;

    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            if current > max_streak {
                max_streak = current;
            }
        } else {
            current = 0;
        }
    }
    max_streak
}
