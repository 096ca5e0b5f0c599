//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row and
//! columns `Date,Open,High,Low,Close,Volume`. Dates may carry a time
//! suffix; only the leading `YYYY-MM-DD` is used.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Parse every bar in a CSV file, sorted by date.
    pub fn read_file(path: &Path) -> Result<Vec<OhlcvBar>, TraderError> {
        let content = fs::read_to_string(path).map_err(|e| TraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_bars(&content)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'r str, TraderError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| TraderError::Data {
            reason: format!("missing {} column", name),
        })
}

fn number(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, TraderError> {
    let raw = field(record, idx, name)?;
    raw.parse().map_err(|e| TraderError::Data {
        reason: format!("invalid {} value {:?}: {}", name, raw, e),
    })
}

pub(crate) fn parse_bars(content: &str) -> Result<Vec<OhlcvBar>, TraderError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| TraderError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = field(&record, 0, "date")?;
        let day = date_str.get(..10).unwrap_or(date_str);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| TraderError::Data {
            reason: format!("invalid date format {:?}: {}", date_str, e),
        })?;

        bars.push(OhlcvBar {
            date,
            open: number(&record, 1, "open")?,
            high: number(&record, 2, "high")?,
            low: number(&record, 3, "low")?,
            close: number(&record, 4, "close")?,
            volume: number(&record, 5, "volume")?,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TraderError> {
        let bars = Self::read_file(&self.csv_path(symbol))?;
        Ok(bars
            .into_iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "Date,Open,High,Low,Close,Volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17 00:00:00-05:00,110.0,120.0,105.0,115.0,55000.5\n";

        fs::write(path.join("EURUSD.csv"), csv_content).unwrap();
        fs::write(path.join("AAPL.csv"), "Date,Open,High,Low,Close,Volume\n").unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_ohlcv("EURUSD", None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert_eq!(bars[2].date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(bars[2].volume, 55000.5);
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let bars = adapter.fetch_ohlcv("EURUSD", Some(day), Some(day)).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, day);
    }

    #[test]
    fn fetch_ohlcv_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ohlcv("XYZ", None, None),
            Err(TraderError::Data { .. })
        ));
    }

    #[test]
    fn malformed_number_is_error() {
        let err = parse_bars("Date,Open,High,Low,Close,Volume\n2024-01-15,1,2,x,1,1\n")
            .unwrap_err();
        assert!(err.to_string().contains("invalid low value"));
    }

    #[test]
    fn malformed_date_is_error() {
        assert!(parse_bars("Date,Open,High,Low,Close,Volume\n15/01/2024,1,2,0,1,1\n").is_err());
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_symbols().unwrap(), vec!["AAPL", "EURUSD"]);
    }
}
