//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! `date` column (or the first column if none is named so) holds `YYYY-MM-DD`;
//! the `close` column holds the closing price. Other columns are ignored.

use crate::domain::config_validation::DATE_FORMAT;
use crate::domain::error::MacdError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

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

    fn read_points(&self, symbol: &str) -> Result<Vec<PricePoint>, MacdError> {
        let unavailable = |reason: String| MacdError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

        let headers = rdr
            .headers()
            .map_err(|e| unavailable(format!("CSV header error: {}", e)))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date_col = column("date").unwrap_or(0);
        let close_col =
            column("close").ok_or_else(|| unavailable("missing close column".into()))?;

        let mut points = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| unavailable(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| unavailable("missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
                .map_err(|e| unavailable(format!("invalid date '{}': {}", date_str, e)))?;

            let close_str = record.get(close_col).unwrap_or("").trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                warn!(symbol, %date, line = line + 2, "skipping row without a close price");
                continue;
            }
            let close: f64 = close_str
                .parse()
                .map_err(|e| unavailable(format!("invalid close value '{}': {}", close_str, e)))?;

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacdError> {
        let points: Vec<PricePoint> = self
            .read_points(symbol)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date < end_date)
            .collect();

        if points.is_empty() {
            return Err(MacdError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no prices between {} and {}", start_date, end_date),
            });
        }

        debug!(symbol, bars = points.len(), "loaded prices from csv");
        PriceSeries::new(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, MacdError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdError> {
        let points = self.read_points(symbol)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
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
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("CBA.csv"), "date,close\n").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_prices_reads_close_column() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_prices("BHP", date(15), date(18)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![105.0, 110.0, 115.0]);
        assert_eq!(series.first_date(), Some(date(15)));
    }

    #[test]
    fn fetch_prices_end_is_exclusive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_prices("BHP", date(16), date(17)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first_date(), Some(date(16)));
    }

    #[test]
    fn fetch_prices_sorts_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,close\n2024-01-03,3.0\n2024-01-01,1.0\n2024-01-02,2.0\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let series = adapter.fetch_prices("X", date(1), date(10)).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn fetch_prices_skips_null_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,close\n2024-01-01,1.0\n2024-01-02,null\n2024-01-03,3.0\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let series = adapter.fetch_prices("X", date(1), date(10)).unwrap();
        assert_eq!(series.closes(), vec![1.0, 3.0]);
    }

    #[test]
    fn fetch_prices_missing_file_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_prices("XYZ", date(1), date(31)).unwrap_err();
        assert!(matches!(err, MacdError::DataUnavailable { ref symbol, .. } if symbol == "XYZ"));
    }

    #[test]
    fn fetch_prices_empty_range_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_prices("BHP", date(1), date(10)).unwrap_err();
        assert!(matches!(err, MacdError::DataUnavailable { .. }));
    }

    #[test]
    fn fetch_prices_missing_close_column() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("X.csv"), "date,price\n2024-01-01,1.0\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_prices("X", date(1), date(10)).unwrap_err();
        assert!(err.to_string().contains("missing close column"));
    }

    #[test]
    fn fetch_prices_duplicate_dates_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("X.csv"),
            "date,close\n2024-01-01,1.0\n2024-01-01,2.0\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.fetch_prices("X", date(1), date(10)).unwrap_err();
        assert!(matches!(err, MacdError::InvalidSeries { .. }));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BHP", "CBA"]);
    }

    #[test]
    fn data_range_reports_bounds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(
            adapter.get_data_range("BHP").unwrap(),
            Some((date(15), date(17), 3))
        );
        assert_eq!(adapter.get_data_range("CBA").unwrap(), None);
    }
}
