//! Backtest summary statistics.

use super::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub net_profit: f64,
    pub total_entries: usize,
    pub total_exits: usize,
    pub winning_exits: usize,
    /// Fraction of exits that settled with positive P&L.
    pub win_rate: f64,
    /// (max(equity) - min(equity)) / max(equity)
    pub max_drawdown: f64,
    /// Largest decline from a running peak.
    pub peak_to_trough_drawdown: f64,
    /// Longest run of bars spent below a running peak.
    pub max_drawdown_duration: usize,
}

impl BacktestSummary {
    pub fn compute(result: &BacktestResult) -> Self {
        let final_balance = result.final_balance();
        let total_entries = result.entries().count();
        let total_exits = result.exits().count();
        let winning_exits = result
            .exits()
            .filter(|t| t.pnl.is_some_and(|pnl| pnl > 0.0))
            .count();
        let win_rate = if total_exits > 0 {
            winning_exits as f64 / total_exits as f64
        } else {
            0.0
        };
        let (peak_to_trough_drawdown, max_drawdown_duration) =
            peak_to_trough_drawdown(&result.equity_curve);

        BacktestSummary {
            initial_balance: result.initial_balance,
            final_balance,
            net_profit: final_balance - result.initial_balance,
            total_entries,
            total_exits,
            winning_exits,
            win_rate,
            max_drawdown: range_drawdown(&result.equity_curve),
            peak_to_trough_drawdown,
            max_drawdown_duration,
        }
    }
}

/// Spread between the highest and lowest equity, relative to the highest.
pub fn range_drawdown(equity_curve: &[f64]) -> f64 {
    let max = equity_curve.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = equity_curve.iter().copied().fold(f64::INFINITY, f64::min);
    if equity_curve.is_empty() || max <= 0.0 {
        return 0.0;
    }
    (max - min) / max
}

/// `(max drawdown, longest drawdown in bars)` measured from running peaks.
pub fn peak_to_trough_drawdown(equity_curve: &[f64]) -> (f64, usize) {
    let Some(&first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    let mut current_duration = 0usize;
    let mut max_duration = 0usize;

    for &equity in equity_curve {
        if equity >= peak {
            peak = equity;
            current_duration = 0;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - equity) / peak);
            current_duration += 1;
            max_duration = max_duration.max(current_duration);
        }
    }

    (max_dd, max_duration)
}
