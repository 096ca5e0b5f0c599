//! Bollinger Bands.
//!
//! - Middle: SMA over `period` closes
//! - Upper/Lower: Middle ± multiplier × StdDev
//!
//! StdDev is the sample standard deviation (divides by N-1), so a period of
//! at least 2 is required. Default parameters: period=20, multiplier=2.0.

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> Option<BollingerBands> {
    if period < 2 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|c| {
            let diff = c - middle;
            diff * diff
        })
        .sum::<f64>()
        / (period - 1) as f64;
    let stddev = variance.sqrt();

    Some(BollingerBands {
        upper: middle + multiplier * stddev,
        middle,
        lower: middle - multiplier * stddev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_warmup() {
        assert_eq!(bollinger(&[1.0, 2.0], 3, 2.0), None);
        assert!(bollinger(&[1.0, 2.0, 3.0], 3, 2.0).is_some());
        assert_eq!(bollinger(&[1.0, 2.0, 3.0], 1, 2.0), None);
    }

    #[test]
    fn bollinger_constant_values_collapse() {
        let b = bollinger(&[100.0; 25], 20, 2.0).unwrap();
        assert_eq!(b.upper, 100.0);
        assert_eq!(b.middle, 100.0);
        assert_eq!(b.lower, 100.0);
    }

    #[test]
    fn bollinger_sample_stddev() {
        // mean 20, sample variance ((100 + 0 + 100) / 2) = 100, stddev 10
        let b = bollinger(&[10.0, 20.0, 30.0], 3, 2.0).unwrap();
        assert!((b.middle - 20.0).abs() < 1e-12);
        assert!((b.upper - 40.0).abs() < 1e-12);
        assert!((b.lower - 0.0).abs() < 1e-12);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + (i % 5) as f64).collect();
        let b = bollinger(&closes, DEFAULT_PERIOD, DEFAULT_MULTIPLIER).unwrap();
        assert!(((b.upper - b.middle) - (b.middle - b.lower)).abs() < 1e-9);
    }
}
