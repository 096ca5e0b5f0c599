//! Simple Moving Average over the trailing `period` values.

pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_uses_trailing_window() {
        let v = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert!((v - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_undefined_when_short() {
        assert_eq!(sma(&[1.0, 2.0], 3), None);
        assert_eq!(sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn sma_period_one_is_last_value() {
        assert_eq!(sma(&[7.0, 9.0], 1), Some(9.0));
    }
}
