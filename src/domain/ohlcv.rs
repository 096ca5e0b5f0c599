//! OHLCV bars, column-oriented price series and trailing windows.

use chrono::NaiveDate;

use super::error::TraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// (high + low) / 2
pub(crate) fn median_price(high: f64, low: f64) -> f64 {
    (high + low) / 2.0
}

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub(crate) fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Chronological price history stored as parallel columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from bars, rejecting out-of-order dates.
    pub fn from_bars(bars: &[OhlcvBar]) -> Result<Self, TraderError> {
        if let Some(pair) = bars.windows(2).find(|w| w[1].date < w[0].date) {
            return Err(TraderError::Data {
                reason: format!(
                    "bars out of chronological order: {} follows {}",
                    pair[1].date, pair[0].date
                ),
            });
        }

        let mut series = PriceSeries {
            dates: Vec::with_capacity(bars.len()),
            opens: Vec::with_capacity(bars.len()),
            highs: Vec::with_capacity(bars.len()),
            lows: Vec::with_capacity(bars.len()),
            closes: Vec::with_capacity(bars.len()),
            volumes: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            series.dates.push(bar.date);
            series.opens.push(bar.open);
            series.highs.push(bar.high);
            series.lows.push(bar.low);
            series.closes.push(bar.close);
            series.volumes.push(bar.volume);
        }
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Trailing window covering bars `0..=end`.
    pub fn window_through(&self, end: usize) -> PriceWindow<'_> {
        let stop = (end + 1).min(self.len());
        PriceWindow {
            closes: &self.closes[..stop],
            highs: &self.highs[..stop],
            lows: &self.lows[..stop],
            volumes: &self.volumes[..stop],
        }
    }

    /// Window over the whole series.
    pub fn full_window(&self) -> PriceWindow<'_> {
        PriceWindow {
            closes: &self.closes,
            highs: &self.highs,
            lows: &self.lows,
            volumes: &self.volumes,
        }
    }
}

/// Borrowed trailing window, oldest first. `volumes` may be empty.
#[derive(Debug, Clone, Copy)]
pub struct PriceWindow<'a> {
    pub closes: &'a [f64],
    pub highs: &'a [f64],
    pub lows: &'a [f64],
    pub volumes: &'a [f64],
}

impl<'a> PriceWindow<'a> {
    pub fn new(
        closes: &'a [f64],
        highs: &'a [f64],
        lows: &'a [f64],
        volumes: &'a [f64],
    ) -> Result<Self, TraderError> {
        if highs.len() != closes.len() || lows.len() != closes.len() {
            return Err(TraderError::Data {
                reason: format!(
                    "column lengths differ: closes={} highs={} lows={}",
                    closes.len(),
                    highs.len(),
                    lows.len()
                ),
            });
        }
        if !volumes.is_empty() && volumes.len() != closes.len() {
            return Err(TraderError::Data {
                reason: format!(
                    "volume column has {} values, expected {}",
                    volumes.len(),
                    closes.len()
                ),
            });
        }
        Ok(PriceWindow {
            closes,
            highs,
            lows,
            volumes,
        })
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}
