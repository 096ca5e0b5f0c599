//! Bar-by-bar replay of a strategy over a price history.
//!
//! Each bar is evaluated on the trailing window ending at that bar. Entries
//! happen at the bar's close when a signal fires while FLAT; exits are
//! checked at the same close. The equity curve starts with the initial
//! balance and gains one point per processed bar.

use std::fmt;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::error::TraderError;
use super::ledger::{AccountState, ExitReason, PositionLedger};
use super::ohlcv::PriceSeries;
use super::position::Side;
use super::strategy::{Strategy, TickResult};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Check stops/targets on every bar instead of only on bars with a signal.
    pub check_exits_every_bar: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: 10_000.0,
            check_exits_every_bar: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
    Exit,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "BUY"),
            TradeKind::Sell => write!(f, "SELL"),
            TradeKind::Exit => write!(f, "EXIT"),
        }
    }
}

/// One row of the trade log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub index: usize,
    pub date: Option<NaiveDate>,
    pub kind: TradeKind,
    pub price: f64,
    pub size: f64,
    /// Realized P&L, set on exits only.
    pub pnl: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    /// Balance after the trade.
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_balance: f64,
    pub trades: Vec<TradeRecord>,
    /// Initial balance followed by the balance after each bar.
    pub equity_curve: Vec<f64>,
    pub final_state: AccountState,
    pub bars_processed: usize,
}

impl BacktestResult {
    pub fn final_balance(&self) -> f64 {
        self.final_state.balance
    }

    pub fn entries(&self) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter().filter(|t| t.kind != TradeKind::Exit)
    }

    pub fn exits(&self) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter().filter(|t| t.kind == TradeKind::Exit)
    }
}

struct Replay {
    ledger: PositionLedger,
    trades: Vec<TradeRecord>,
}

impl Replay {
    fn try_enter(
        &mut self,
        tick: &TickResult,
        index: usize,
        date: Option<NaiveDate>,
        price: f64,
    ) -> Result<(), TraderError> {
        let (side, kind) = if tick.buy_signal() {
            (Side::Long, TradeKind::Buy)
        } else {
            (Side::Short, TradeKind::Sell)
        };

        let size = tick.risk.position_size;
        if !size.is_finite() || size <= 0.0 {
            warn!(index, %kind, "signal without position size, skipping entry");
            return Ok(());
        }

        self.ledger
            .enter(side, price, size, tick.risk.stop_loss, tick.risk.take_profit)?;
        self.trades.push(TradeRecord {
            index,
            date,
            kind,
            price,
            size,
            pnl: None,
            exit_reason: None,
            balance: self.ledger.balance(),
        });
        Ok(())
    }

    fn settle_exit(&mut self, index: usize, date: Option<NaiveDate>, price: f64) {
        if let Some(event) = self.ledger.check_exit(price) {
            self.trades.push(TradeRecord {
                index,
                date,
                kind: TradeKind::Exit,
                price,
                size: event.size,
                pnl: Some(event.pnl),
                exit_reason: Some(event.reason),
                balance: event.balance,
            });
        }
    }
}

pub fn run_backtest<S: Strategy>(
    strategy: &S,
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TraderError> {
    let mut replay = Replay {
        ledger: PositionLedger::new(config.initial_balance),
        trades: Vec::new(),
    };
    let mut equity_curve = Vec::with_capacity(series.len() + 1);
    equity_curve.push(config.initial_balance);

    for index in 0..series.len() {
        let window = series.window_through(index);
        let price = series.closes[index];
        let date = series.dates.get(index).copied();
        let tick = strategy.evaluate(&window, replay.ledger.balance());

        if tick.has_signal() {
            if !replay.ledger.in_position() {
                replay.try_enter(&tick, index, date, price)?;
            }
            replay.settle_exit(index, date, price);
        } else if config.check_exits_every_bar {
            replay.settle_exit(index, date, price);
        }

        equity_curve.push(replay.ledger.balance());
    }

    let result = BacktestResult {
        initial_balance: config.initial_balance,
        trades: replay.trades,
        equity_curve,
        final_state: replay.ledger.into_state(),
        bars_processed: series.len(),
    };
    info!(
        bars = result.bars_processed,
        trades = result.trades.len(),
        final_balance = result.final_balance(),
        "backtest complete"
    );
    Ok(result)
}
