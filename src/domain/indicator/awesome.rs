//! Awesome Oscillator.
//!
//! AO = SMA(median, fast) - SMA(median, slow), median = (high + low) / 2.
//! The default fast period of 1 degenerates to the raw median price.

use super::sma::sma;
use crate::domain::ohlcv::median_price;

pub const DEFAULT_FAST: usize = 1;
pub const DEFAULT_SLOW: usize = 34;

pub fn awesome_oscillator(highs: &[f64], lows: &[f64], fast: usize, slow: usize) -> Option<f64> {
    let n = highs.len().min(lows.len());
    let medians: Vec<f64> = highs[..n]
        .iter()
        .zip(&lows[..n])
        .map(|(&h, &l)| median_price(h, l))
        .collect();
    Some(sma(&medians, fast)? - sma(&medians, slow)?)
}

/// `(current, previous)` readings; previous drops the latest bar.
pub fn awesome_pair(
    highs: &[f64],
    lows: &[f64],
    fast: usize,
    slow: usize,
) -> (Option<f64>, Option<f64>) {
    let n = highs.len().min(lows.len());
    let current = awesome_oscillator(&highs[..n], &lows[..n], fast, slow);
    let previous = match n {
        0 => None,
        _ => awesome_oscillator(&highs[..n - 1], &lows[..n - 1], fast, slow),
    };
    (current, previous)
}
