//! Average True Range.
//!
//! TR[i] = max(H[i]-L[i], |H[i]-C[i-1]|, |L[i]-C[i-1]|) for i >= 1.
//! ATR = simple mean of the last `period` true ranges, so `period + 1`
//! bars are needed.

use crate::domain::ohlcv::true_range;

/// True ranges for bars `1..len`; empty with fewer than two bars.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    (1..n)
        .map(|i| true_range(highs[i], lows[i], closes[i - 1]))
        .collect()
}

pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    if period == 0 || n < period + 1 {
        return None;
    }

    // Only the bars feeding the last `period` ranges matter.
    let start = n - period - 1;
    let ranges = true_ranges(&highs[start..n], &lows[start..n], &closes[start..n]);
    Some(ranges.iter().sum::<f64>() / period as f64)
}
