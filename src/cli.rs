//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::augmented::AugmentedStrategy;
use crate::domain::backtest::{BacktestResult, run_backtest};
use crate::domain::config_validation::{
    backtest_config, classifier, linear_classifier, strategy_config, validate_config,
};
use crate::domain::cross::{
    crossing_down, crossing_up, entering_channel, exiting_channel, inside_channel,
    moving_down_percent, moving_up_percent,
};
use crate::domain::error::TraderError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::bollinger::{self, bollinger};
use crate::domain::indicator::macd::{self, macd_series};
use crate::domain::indicator::rsi::rsi;
use crate::domain::metrics::BacktestSummary;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::strategy::{MomentumStrategy, Strategy, StrategyConfig, TickResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const RSI_PERIOD: usize = 14;

#[derive(Parser, Debug)]
#[command(
    name = "momentum-trader",
    about = "Multi-indicator consensus signals and backtesting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where price bars come from.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV file, or a directory of `<SYMBOL>.csv` files when --symbol is set
    #[arg(short, long)]
    pub data: PathBuf,
    #[arg(long)]
    pub symbol: Option<String>,
    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay the strategy over a price history
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        data: DataArgs,
        /// Directory for trades.csv, equity.csv and summary.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Blend the configured linear classifier into the signals
        #[arg(long)]
        with_classifier: bool,
    },
    /// Evaluate one tick on the latest bar
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print indicator readings at the latest bar
    Indicators {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            with_classifier,
        } => run_backtest_command(&config, &data, output.as_deref(), with_classifier),
        Command::Evaluate { config, data } => run_evaluate(&config, &data),
        Command::Indicators { data, config } => run_indicators(&data, config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TraderError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Load bars from a single file or, with a symbol, through the data port.
pub fn load_series(args: &DataArgs) -> Result<PriceSeries, TraderError> {
    let bars = match &args.symbol {
        Some(symbol) => {
            CsvAdapter::new(args.data.clone()).fetch_ohlcv(symbol, args.start, args.end)?
        }
        None => filter_dates(CsvAdapter::read_file(&args.data)?, args.start, args.end),
    };
    if bars.is_empty() {
        return Err(TraderError::Data {
            reason: format!("no bars loaded from {}", args.data.display()),
        });
    }
    info!(bars = bars.len(), "loaded price history");
    PriceSeries::from_bars(&bars)
}

fn filter_dates(
    bars: Vec<OhlcvBar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<OhlcvBar> {
    bars.into_iter()
        .filter(|b| start.is_none_or(|s| b.date >= s))
        .filter(|b| end.is_none_or(|e| b.date <= e))
        .collect()
}

/// Build the strategy described by the config, optionally wrapped with the
/// linear classifier.
pub fn build_strategy(
    config: &dyn ConfigPort,
    with_classifier: bool,
) -> Result<Box<dyn Strategy>, TraderError> {
    let base = MomentumStrategy::new(strategy_config(config)?);
    let model = if with_classifier {
        Some(linear_classifier(config)?)
    } else {
        classifier(config)?
    };

    let strategy: Box<dyn Strategy> = match model {
        Some(model) => {
            info!(weights = ?model.weights, threshold = model.threshold, "classifier enabled");
            let risk = base.risk_manager();
            Box::new(AugmentedStrategy::new(base, model, risk))
        }
        None => Box::new(base),
    };
    Ok(strategy)
}

pub fn run_backtest_pipeline(
    config: &dyn ConfigPort,
    series: &PriceSeries,
    with_classifier: bool,
) -> Result<(BacktestResult, BacktestSummary), TraderError> {
    let bt_config = backtest_config(config)?;
    let strategy = build_strategy(config, with_classifier)?;
    let result = run_backtest(&strategy, series, &bt_config)?;
    let summary = BacktestSummary::compute(&result);
    Ok((result, summary))
}

fn run_backtest_command(
    config_path: &Path,
    data: &DataArgs,
    output: Option<&Path>,
    with_classifier: bool,
) -> Result<(), TraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    let series = load_series(data)?;

    let (result, summary) = run_backtest_pipeline(&adapter, &series, with_classifier)?;
    print_summary(&summary);

    if let Some(dir) = output {
        let report = CsvReportAdapter::new(dir.to_path_buf());
        report.write(&result, &summary)?;
        info!(dir = %report.output_dir().display(), "report written");
    }
    Ok(())
}

fn print_summary(summary: &BacktestSummary) {
    println!("Initial balance:   {:.2}", summary.initial_balance);
    println!("Final balance:     {:.2}", summary.final_balance);
    println!("Net profit:        {:.2}", summary.net_profit);
    println!("Entries:           {}", summary.total_entries);
    println!("Exits:             {}", summary.total_exits);
    println!(
        "Win rate:          {:.2}% ({} of {})",
        summary.win_rate * 100.0,
        summary.winning_exits,
        summary.total_exits
    );
    println!("Max drawdown:      {:.2}%", summary.max_drawdown * 100.0);
    println!(
        "Peak-to-trough:    {:.2}% over {} bars",
        summary.peak_to_trough_drawdown * 100.0,
        summary.max_drawdown_duration
    );
}

fn run_evaluate(config_path: &Path, data: &DataArgs) -> Result<(), TraderError> {
    let adapter = load_config(config_path)?;
    let strategy_cfg = strategy_config(&adapter)?;
    let bt_config = backtest_config(&adapter)?;
    let series = load_series(data)?;

    if series.len() < strategy_cfg.min_history {
        return Err(TraderError::InsufficientData {
            bars: series.len(),
            minimum: strategy_cfg.min_history,
        });
    }

    let strategy = build_strategy(&adapter, false)?;
    let tick = strategy.evaluate(&series.full_window(), bt_config.initial_balance);
    if let Some(date) = series.dates.last() {
        println!("Date:   {date}");
    }
    print_tick(&tick);
    Ok(())
}

fn print_tick(tick: &TickResult) {
    let signal = if tick.buy_signal() {
        "BUY"
    } else if tick.sell_signal() {
        "SELL"
    } else {
        "NONE"
    };
    if let Some(price) = tick.price {
        println!("Close:  {price:.4}");
    }
    println!("Trend:  {}", tick.decision.trend);
    println!(
        "Signal: {signal} (buy votes {}, sell votes {})",
        tick.decision.buy_votes, tick.decision.sell_votes
    );
    for reason in &tick.decision.reasons {
        println!("  - {reason}");
    }
    if tick.has_signal() {
        println!("Size:   {:.4}", tick.risk.position_size);
        println!("Stop:   {:.4}", tick.risk.stop_loss);
        println!("Target: {:.4}", tick.risk.take_profit);
    }
}

fn run_indicators(data: &DataArgs, config_path: Option<&Path>) -> Result<(), TraderError> {
    let strategy_cfg = match config_path {
        Some(path) => strategy_config(&load_config(path)?)?,
        None => StrategyConfig::default(),
    };
    let series = load_series(data)?;
    for line in indicator_report(&series, &strategy_cfg) {
        println!("{line}");
    }
    Ok(())
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{v:.4}"))
}

/// Latest-bar readings of the strategy indicators plus RSI, MACD and
/// Bollinger bands, with crossover and channel annotations.
pub fn indicator_report(series: &PriceSeries, cfg: &StrategyConfig) -> Vec<String> {
    let window = series.full_window();
    let closes = window.closes;
    let readings = MomentumStrategy::new(cfg.clone()).readings(&window);
    let mut lines = Vec::new();

    let labelled = [
        (IndicatorType::Ema(cfg.ema_fast), readings.ema_fast),
        (IndicatorType::Ema(cfg.ema_mid), readings.ema_mid),
        (IndicatorType::Ema(cfg.ema_slow), readings.ema_slow),
        (IndicatorType::Atr(cfg.atr_period), readings.atr),
        (IndicatorType::Rsi(RSI_PERIOD), rsi(closes, RSI_PERIOD)),
    ];
    for (kind, value) in labelled {
        lines.push(format!("{kind}: {}", fmt_value(value)));
    }

    let stoch = IndicatorType::Stochastic {
        k_period: cfg.stoch_k,
        d_period: cfg.stoch_d,
    };
    lines.push(format!(
        "{stoch}: %K {} %D {}",
        fmt_value(readings.stoch_k),
        fmt_value(readings.stoch_d)
    ));
    let ao = IndicatorType::Awesome {
        fast: cfg.ao_fast,
        slow: cfg.ao_slow,
    };
    lines.push(format!(
        "{ao}: {} (previous {})",
        fmt_value(readings.ao_current),
        fmt_value(readings.ao_previous)
    ));

    let macd_kind = IndicatorType::Macd {
        fast: macd::DEFAULT_FAST,
        slow: macd::DEFAULT_SLOW,
        signal: macd::DEFAULT_SIGNAL,
    };
    if closes.len() >= macd_kind.min_observations() {
        let series = macd_series(closes, macd::DEFAULT_FAST, macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);
        if let [.., prev, last] = series.as_slice() {
            let cross = if crossing_up(prev.histogram, last.histogram, 0.0) {
                " bullish crossover"
            } else if crossing_down(prev.histogram, last.histogram, 0.0) {
                " bearish crossover"
            } else {
                ""
            };
            lines.push(format!(
                "{macd_kind}: line {:.4} signal {:.4} histogram {:.4}{cross}",
                last.line, last.signal, last.histogram
            ));
        }
    } else {
        lines.push(format!("{macd_kind}: undefined"));
    }

    let boll_kind = IndicatorType::Bollinger {
        period: bollinger::DEFAULT_PERIOD,
        stddev_mult_x100: 200,
    };
    match (
        bollinger(closes, bollinger::DEFAULT_PERIOD, bollinger::DEFAULT_MULTIPLIER),
        window.last_close(),
    ) {
        (Some(bands), Some(close)) => {
            let prev = closes.len().checked_sub(2).map(|i| closes[i]).unwrap_or(close);
            let position = if entering_channel(prev, close, bands.lower, bands.upper) {
                "entering band"
            } else if exiting_channel(prev, close, bands.lower, bands.upper) {
                "exiting band"
            } else if inside_channel(close, bands.lower, bands.upper) {
                "inside band"
            } else {
                "outside band"
            };
            lines.push(format!(
                "{boll_kind}: upper {:.4} middle {:.4} lower {:.4}, close {position}",
                bands.upper, bands.middle, bands.lower
            ));
        }
        _ => lines.push(format!("{boll_kind}: undefined")),
    }

    if let [.., prev, last] = closes {
        let up = moving_up_percent(*prev, *last);
        let down = moving_down_percent(*prev, *last);
        lines.push(format!("Last change: +{up:.2}% / -{down:.2}%"));
    }

    lines
}

fn run_validate(config_path: &Path) -> Result<(), TraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;

    let strategy_cfg = strategy_config(&adapter)?;
    let bt_config = backtest_config(&adapter)?;
    println!(
        "EMA spans:   {}/{}/{}",
        strategy_cfg.ema_fast, strategy_cfg.ema_mid, strategy_cfg.ema_slow
    );
    println!(
        "Stochastic:  {}/{} (oversold {}, overbought {})",
        strategy_cfg.stoch_k, strategy_cfg.stoch_d, strategy_cfg.oversold, strategy_cfg.overbought
    );
    println!("AO:          {}/{}", strategy_cfg.ao_fast, strategy_cfg.ao_slow);
    println!("ATR period:  {}", strategy_cfg.atr_period);
    println!("Min history: {}", strategy_cfg.min_history);
    println!("Balance:     {:.2}", bt_config.initial_balance);
    if classifier(&adapter)?.is_some() {
        println!("Classifier:  enabled");
    }
    println!("Configuration is valid.");
    Ok(())
}
