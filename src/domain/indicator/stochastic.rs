//! Stochastic Oscillator with double EMA smoothing.
//!
//! raw %K = 100 × (C - LL(k)) / (HH(k) - LL(k)), defined from bar `k-1`.
//! %K is then EMA-smoothed with span `d`, and %D is the EMA (span `d`) of
//! the smoothed %K. This deliberately differs from the textbook SMA
//! smoothing. A zero range (HH == LL) yields the midpoint, 50.
//! The latest reading needs `k + d` bars.

use super::ema::ema_series;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;
const FLAT_RANGE_K: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticReading {
    pub k: f64,
    pub d: f64,
}

/// Unsmoothed %K for every bar from `k_period - 1` onward.
pub fn raw_k_series(highs: &[f64], lows: &[f64], closes: &[f64], k_period: usize) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    if k_period == 0 || n < k_period {
        return Vec::new();
    }

    (k_period - 1..n)
        .map(|i| {
            let start = i + 1 - k_period;
            let highest = highs[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows[start..=i]
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            let range = highest - lowest;
            if range == 0.0 {
                FLAT_RANGE_K
            } else {
                100.0 * (closes[i] - lowest) / range
            }
        })
        .collect()
}

/// Smoothed readings aligned with [`raw_k_series`].
pub fn stochastic_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> Vec<StochasticReading> {
    if d_period == 0 {
        return Vec::new();
    }
    let k_smooth = ema_series(&raw_k_series(highs, lows, closes, k_period), d_period);
    let d_smooth = ema_series(&k_smooth, d_period);
    k_smooth
        .into_iter()
        .zip(d_smooth)
        .map(|(k, d)| StochasticReading { k, d })
        .collect()
}

pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> Option<StochasticReading> {
    let n = highs.len().min(lows.len()).min(closes.len());
    if k_period == 0 || d_period == 0 || n < k_period + d_period {
        return None;
    }
    stochastic_series(highs, lows, closes, k_period, d_period)
        .last()
        .copied()
}
