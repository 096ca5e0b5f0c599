//! Backtest report output port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TraderError;
use crate::domain::metrics::BacktestSummary;

pub trait ReportPort {
    fn write(&self, result: &BacktestResult, summary: &BacktestSummary) -> Result<(), TraderError>;
}
