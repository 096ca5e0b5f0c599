//! CSV report adapter implementing ReportPort.
//!
//! Writes `trades.csv`, `equity.csv` and `summary.csv` into an output
//! directory, creating it if needed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TraderError;
use crate::domain::metrics::BacktestSummary;
use crate::ports::report_port::ReportPort;

pub const TRADES_FILE: &str = "trades.csv";
pub const EQUITY_FILE: &str = "equity.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn writer(&self, name: &str) -> Result<csv::Writer<fs::File>, TraderError> {
        csv::Writer::from_path(self.output_dir.join(name)).map_err(csv_error)
    }

    fn write_trades(&self, result: &BacktestResult) -> Result<(), TraderError> {
        let mut wtr = self.writer(TRADES_FILE)?;
        wtr.write_record(["index", "date", "type", "price", "size", "pnl", "balance"])
            .map_err(csv_error)?;
        for trade in &result.trades {
            wtr.write_record([
                trade.index.to_string(),
                trade.date.map(|d| d.to_string()).unwrap_or_default(),
                trade.kind.to_string(),
                trade.price.to_string(),
                trade.size.to_string(),
                trade.pnl.map(|p| p.to_string()).unwrap_or_default(),
                trade.balance.to_string(),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_equity(&self, result: &BacktestResult) -> Result<(), TraderError> {
        let mut wtr = self.writer(EQUITY_FILE)?;
        wtr.write_record(["index", "balance"]).map_err(csv_error)?;
        for (i, balance) in result.equity_curve.iter().enumerate() {
            wtr.write_record([i.to_string(), balance.to_string()])
                .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_summary(&self, summary: &BacktestSummary) -> Result<(), TraderError> {
        let mut wtr = self.writer(SUMMARY_FILE)?;
        wtr.write_record(["metric", "value"]).map_err(csv_error)?;
        let rows = [
            ("initial_balance", summary.initial_balance.to_string()),
            ("final_balance", summary.final_balance.to_string()),
            ("net_profit", summary.net_profit.to_string()),
            ("total_entries", summary.total_entries.to_string()),
            ("total_exits", summary.total_exits.to_string()),
            ("winning_exits", summary.winning_exits.to_string()),
            ("win_rate", summary.win_rate.to_string()),
            ("max_drawdown", summary.max_drawdown.to_string()),
            (
                "peak_to_trough_drawdown",
                summary.peak_to_trough_drawdown.to_string(),
            ),
            (
                "max_drawdown_duration",
                summary.max_drawdown_duration.to_string(),
            ),
        ];
        for (metric, value) in rows {
            wtr.write_record([metric, value.as_str()]).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> TraderError {
    TraderError::Io(std::io::Error::other(e.to_string()))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, summary: &BacktestSummary) -> Result<(), TraderError> {
        fs::create_dir_all(&self.output_dir)?;
        self.write_trades(result)?;
        self.write_equity(result)?;
        self.write_summary(summary)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{TradeKind, TradeRecord};
    use crate::domain::ledger::{AccountState, ExitReason};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn sample_result() -> BacktestResult {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        BacktestResult {
            initial_balance: 10_000.0,
            trades: vec![
                TradeRecord {
                    index: 0,
                    date: Some(date),
                    kind: TradeKind::Buy,
                    price: 100.0,
                    size: 10.0,
                    pnl: None,
                    exit_reason: None,
                    balance: 9_000.0,
                },
                TradeRecord {
                    index: 1,
                    date: None,
                    kind: TradeKind::Exit,
                    price: 110.0,
                    size: 10.0,
                    pnl: Some(100.0),
                    exit_reason: Some(ExitReason::TakeProfit),
                    balance: 10_100.0,
                },
            ],
            equity_curve: vec![10_000.0, 9_000.0, 10_100.0],
            final_state: AccountState {
                balance: 10_100.0,
                position: None,
            },
            bars_processed: 2,
        }
    }

    #[test]
    fn writes_trade_log_and_equity_curve() {
        let dir = tempdir().unwrap();
        let adapter = CsvReportAdapter::new(dir.path().to_path_buf());
        let result = sample_result();
        adapter
            .write(&result, &BacktestSummary::compute(&result))
            .unwrap();

        let trades = fs::read_to_string(dir.path().join(TRADES_FILE)).unwrap();
        let lines: Vec<&str> = trades.lines().collect();
        assert_eq!(lines[0], "index,date,type,price,size,pnl,balance");
        assert_eq!(lines[1], "0,2024-03-01,BUY,100,10,,9000");
        assert_eq!(lines[2], "1,,EXIT,110,10,100,10100");

        let equity = fs::read_to_string(dir.path().join(EQUITY_FILE)).unwrap();
        assert_eq!(equity, "index,balance\n0,10000\n1,9000\n2,10100\n");
    }

    #[test]
    fn writes_summary_metrics() {
        let dir = tempdir().unwrap();
        let adapter = CsvReportAdapter::new(dir.path().to_path_buf());
        let result = sample_result();
        adapter
            .write(&result, &BacktestSummary::compute(&result))
            .unwrap();

        let summary = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        assert!(summary.contains("net_profit,100\n"));
        assert!(summary.contains("total_exits,1\n"));
        assert!(summary.contains("win_rate,1\n"));
    }

    #[test]
    fn creates_nested_output_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("runs/latest");
        let adapter = CsvReportAdapter::new(nested.clone());
        let result = sample_result();
        adapter
            .write(&result, &BacktestSummary::compute(&result))
            .unwrap();
        assert!(nested.join(TRADES_FILE).exists());
        assert_eq!(adapter.output_dir(), nested.as_path());
    }
}
