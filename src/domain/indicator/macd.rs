//! MACD (Moving Average Convergence Divergence).
//!
//! line = EMA(fast) - EMA(slow), signal = EMA(signal) of the line,
//! histogram = line - signal. Both EMAs are seeded with the first value,
//! so the series is defined from the first close; the latest reading is
//! reported only once `slow + signal` closes exist.

use super::ema::ema_series;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdReading> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Vec::new();
    }

    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&line, signal);

    line.iter()
        .zip(&signal_line)
        .map(|(&line, &signal)| MacdReading {
            line,
            signal,
            histogram: line - signal,
        })
        .collect()
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdReading> {
    if fast == 0 || slow == 0 || signal == 0 || closes.len() < slow + signal {
        return None;
    }
    macd_series(closes, fast, slow, signal).last().copied()
}

pub fn macd_default(closes: &[f64]) -> Option<MacdReading> {
    macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::ema::ema;

    fn trending(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5 + (i % 3) as f64).collect()
    }

    #[test]
    fn macd_warmup_default() {
        assert_eq!(macd_default(&trending(34)), None);
        assert!(macd_default(&trending(35)).is_some());
    }

    #[test]
    fn macd_zero_period() {
        assert_eq!(macd(&trending(60), 0, 26, 9), None);
        assert!(macd_series(&trending(60), 12, 26, 0).is_empty());
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        for r in macd_series(&trending(60), 12, 26, 9) {
            assert!((r.histogram - (r.line - r.signal)).abs() < 1e-12);
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let closes = trending(60);
        let r = macd_default(&closes).unwrap();
        let expected = ema(&closes, 12).unwrap() - ema(&closes, 26).unwrap();
        assert!((r.line - expected).abs() < 1e-12);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let r = macd_default(&closes).unwrap();
        assert!(r.line > 0.0);
        assert!(r.signal > 0.0);
    }

    #[test]
    fn macd_flat_is_zero() {
        let r = macd_default(&vec![50.0; 40]).unwrap();
        assert_eq!(r.line, 0.0);
        assert_eq!(r.signal, 0.0);
        assert_eq!(r.histogram, 0.0);
    }
}
