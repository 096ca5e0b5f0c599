//! Exponential Moving Average.
//!
//! alpha = 2/(span+1), seeded with the first observation (not an SMA), then
//! EMA[i] = EMA[i-1] + alpha * (x[i] - EMA[i-1]).
//! The latest value is undefined until `span` observations exist.

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA over every element of `values`; empty when `span` is zero.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = smoothing_factor(span);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => p + alpha * (x - p),
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

pub fn ema(values: &[f64], span: usize) -> Option<f64> {
    if span == 0 || values.len() < span {
        return None;
    }
    ema_series(values, span).last().copied()
}
