//! Technical indicator library.
//!
//! Every indicator is a pure function over trailing numeric columns
//! (closes, highs, lows), oldest first. Results are `Option`s: `None` is the
//! ordinary "undefined" state returned while the window is shorter than the
//! indicator's minimum observation count. Layered indicators (EMA, MACD,
//! Stochastic) also expose a `*_series` function; the latest-value function
//! always equals the last element of the corresponding series.

pub mod atr;
pub mod awesome;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

use std::fmt;

/// Indicator identity plus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Awesome {
        fast: usize,
        slow: usize,
    },
}

impl IndicatorType {
    /// Number of observations needed before the indicator is defined.
    pub fn min_observations(&self) -> usize {
        match *self {
            IndicatorType::Ema(period) => period,
            IndicatorType::Rsi(period) | IndicatorType::Atr(period) => period + 1,
            IndicatorType::Macd { slow, signal, .. } => slow + signal,
            IndicatorType::Stochastic { k_period, d_period } => k_period + d_period,
            IndicatorType::Bollinger { period, .. } => period.max(2),
            IndicatorType::Awesome { fast, slow } => fast.max(slow),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Awesome { fast, slow } => write!(f, "AO({},{})", fast, slow),
        }
    }
}
