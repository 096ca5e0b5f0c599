//! Configuration loading and validation.
//!
//! Each section is read through [`ConfigPort`]. Missing keys fall back to
//! the domain defaults; values that are present must parse, and every value
//! is checked before a run starts.

use crate::domain::augmented::LinearClassifier;
use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TraderError;
use crate::domain::risk::RiskConfig;
use crate::domain::strategy::StrategyConfig;
use crate::ports::config_port::ConfigPort;

pub const CLASSIFIER_FEATURES: usize = 6;
pub const DEFAULT_CLASSIFIER_THRESHOLD: f64 = 0.5;

/// Validate every section without building anything.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    backtest_config(config)?;
    strategy_config(config)?;
    classifier(config)?;
    Ok(())
}

/// `[account]` and `[backtest]`.
pub fn backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    let defaults = BacktestConfig::default();
    let initial_balance = double(config, "account", "initial_balance", defaults.initial_balance)?;
    if !initial_balance.is_finite() || initial_balance <= 0.0 {
        return Err(TraderError::invalid(
            "account",
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    Ok(BacktestConfig {
        initial_balance,
        check_exits_every_bar: flag(
            config,
            "backtest",
            "check_exits_every_bar",
            defaults.check_exits_every_bar,
        )?,
    })
}

/// `[strategy]` together with `[risk]`.
pub fn strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, TraderError> {
    let d = StrategyConfig::default();
    let parsed = StrategyConfig {
        ema_fast: period(config, "ema_fast", d.ema_fast)?,
        ema_mid: period(config, "ema_mid", d.ema_mid)?,
        ema_slow: period(config, "ema_slow", d.ema_slow)?,
        stoch_k: period(config, "stoch_k", d.stoch_k)?,
        stoch_d: period(config, "stoch_d", d.stoch_d)?,
        overbought: double(config, "strategy", "overbought", d.overbought)?,
        oversold: double(config, "strategy", "oversold", d.oversold)?,
        ao_fast: period(config, "ao_fast", d.ao_fast)?,
        ao_slow: period(config, "ao_slow", d.ao_slow)?,
        atr_period: period(config, "atr_period", d.atr_period)?,
        min_history: period(config, "min_history", d.min_history)?,
        risk: risk_config(config)?,
    };

    validate_thresholds(&parsed)?;
    validate_spans(&parsed)?;
    Ok(parsed)
}

/// `[classifier]`; `None` unless `enabled = true`.
pub fn classifier(config: &dyn ConfigPort) -> Result<Option<LinearClassifier>, TraderError> {
    if !flag(config, "classifier", "enabled", false)? {
        return Ok(None);
    }
    linear_classifier(config).map(Some)
}

/// `[classifier]` weights, bias and threshold, regardless of `enabled`.
pub fn linear_classifier(config: &dyn ConfigPort) -> Result<LinearClassifier, TraderError> {
    let weights = match config.get_double_list("classifier", "weights") {
        None => {
            return Err(TraderError::ConfigMissing {
                section: "classifier".to_string(),
                key: "weights".to_string(),
            });
        }
        Some(Err(item)) => {
            return Err(TraderError::invalid(
                "classifier",
                "weights",
                format!("{item:?} is not a number"),
            ));
        }
        Some(Ok(weights)) => weights,
    };
    if weights.len() != CLASSIFIER_FEATURES {
        return Err(TraderError::invalid(
            "classifier",
            "weights",
            format!(
                "expected {} weights, got {}",
                CLASSIFIER_FEATURES,
                weights.len()
            ),
        ));
    }

    let bias = double(config, "classifier", "bias", 0.0)?;
    let threshold = double(config, "classifier", "threshold", DEFAULT_CLASSIFIER_THRESHOLD)?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(TraderError::invalid(
            "classifier",
            "threshold",
            "threshold must be non-negative",
        ));
    }

    Ok(LinearClassifier::new(weights, bias, threshold))
}

fn risk_config(config: &dyn ConfigPort) -> Result<RiskConfig, TraderError> {
    let d = RiskConfig::default();
    let risk_per_trade = double(config, "risk", "risk_per_trade", d.risk_per_trade)?;
    if risk_per_trade.is_nan() || risk_per_trade <= 0.0 || risk_per_trade > 1.0 {
        return Err(TraderError::invalid(
            "risk",
            "risk_per_trade",
            "risk_per_trade must be in (0, 1]",
        ));
    }
    let risk_multiplier = positive(config, "risk", "risk_multiplier", d.risk_multiplier)?;
    let reward_ratio = positive(config, "risk", "reward_ratio", d.reward_ratio)?;
    Ok(RiskConfig {
        risk_per_trade,
        risk_multiplier,
        reward_ratio,
    })
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TraderError> {
    let value = double(config, section, key, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(TraderError::invalid(
            section,
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(value)
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TraderError> {
    let fallback = i64::try_from(default).unwrap_or(i64::MAX);
    let value = present_or(config.get_int("strategy", key), "strategy", key, fallback)?;
    match usize::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TraderError::invalid(
            "strategy",
            key,
            format!("{key} must be a positive integer"),
        )),
    }
}

/// Absent keys take the default; present but malformed values are rejected.
fn present_or<T>(
    found: Option<Result<T, String>>,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, TraderError> {
    match found {
        None => Ok(default),
        Some(Ok(value)) => Ok(value),
        Some(Err(reason)) => Err(TraderError::invalid(section, key, reason)),
    }
}

fn double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TraderError> {
    present_or(config.get_double(section, key), section, key, default)
}

fn flag(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, TraderError> {
    present_or(config.get_bool(section, key), section, key, default)
}

fn validate_thresholds(c: &StrategyConfig) -> Result<(), TraderError> {
    for (key, value) in [("overbought", c.overbought), ("oversold", c.oversold)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(TraderError::invalid(
                "strategy",
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    if c.oversold >= c.overbought {
        return Err(TraderError::invalid(
            "strategy",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

fn validate_spans(c: &StrategyConfig) -> Result<(), TraderError> {
    if c.ema_fast >= c.ema_mid {
        return Err(TraderError::invalid(
            "strategy",
            "ema_fast",
            "ema_fast must be shorter than ema_mid",
        ));
    }
    if c.ema_mid >= c.ema_slow {
        return Err(TraderError::invalid(
            "strategy",
            "ema_mid",
            "ema_mid must be shorter than ema_slow",
        ));
    }
    if c.ao_fast >= c.ao_slow {
        return Err(TraderError::invalid(
            "strategy",
            "ao_fast",
            "ao_fast must be shorter than ao_slow",
        ));
    }
    if c.min_history < c.ema_slow {
        return Err(TraderError::invalid(
            "strategy",
            "min_history",
            "min_history must cover ema_slow",
        ));
    }
    Ok(())
}
