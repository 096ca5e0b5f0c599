//! RSI (Relative Strength Index).
//!
//! Average gain/loss are simple means of the positive/negative close deltas
//! over the last `period` changes:
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! A zero average loss has no finite ratio. It resolves to 100 when there
//! were gains and to 50 when the window is perfectly flat.
//! Undefined until `period + 1` closes exist.

pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let tail = &closes[closes.len() - period - 1..];
    let (mut gains, mut losses) = (0.0, 0.0);
    for pair in tail.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let value = if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_warmup() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), None);

        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&closes, 14).is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!((rsi(&closes, 14).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert!(rsi(&closes, 14).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_window_is_50() {
        let closes = vec![42.0; 20];
        assert_eq!(rsi(&closes, 14), Some(50.0));
    }

    #[test]
    fn rsi_known_value() {
        // deltas: +2, -1, +2, -1 → avg_gain 1.0, avg_loss 0.5 → RS 2 → 66.67
        let closes = [10.0, 12.0, 11.0, 13.0, 12.0];
        let v = rsi(&closes, 4).unwrap();
        assert!((v - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn rsi_only_uses_trailing_window() {
        // Early crash is outside the 4-change window.
        let closes = [100.0, 50.0, 10.0, 12.0, 11.0, 13.0, 12.0];
        let v = rsi(&closes, 4).unwrap();
        assert!((v - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        for end in 15..=closes.len() {
            let v = rsi(&closes[..end], 14).unwrap();
            assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
        }
    }
}
