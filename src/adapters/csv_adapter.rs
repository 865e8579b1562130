//! CSV file price adapter.
//!
//! Layout: a header row, then `label,price[,factor...]`. Every column after
//! `price` becomes a named factor on each point.

use crate::domain::error::ReviewError;
use crate::domain::price::PricePoint;
use crate::ports::price_port::PricePort;
use std::collections::BTreeMap;
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

    pub fn read_file(path: &Path) -> Result<Vec<PricePoint>, ReviewError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReviewError::data_source(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse_series(&content)
    }
}

impl PricePort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, ReviewError> {
        Self::read_file(&self.csv_path(symbol))
    }
}

pub fn parse_series(content: &str) -> Result<Vec<PricePoint>, ReviewError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| ReviewError::data_source(format!("CSV header error: {}", e)))?
        .clone();
    if headers.len() < 2 {
        return Err(ReviewError::data_source(
            "CSV needs at least label and price columns",
        ));
    }
    let factor_names: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();

    let mut series = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| ReviewError::data_source(format!("CSV parse error: {}", e)))?;

        let label = record
            .get(0)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ReviewError::data_source(format!("row {}: missing label", row + 1)))?;

        let price: f64 = record
            .get(1)
            .ok_or_else(|| ReviewError::data_source(format!("row {}: missing price", row + 1)))?
            .parse()
            .map_err(|e| {
                ReviewError::data_source(format!("row {}: invalid price value: {}", row + 1, e))
            })?;

        let mut factors = BTreeMap::new();
        for (i, name) in factor_names.iter().enumerate() {
            let raw = record.get(i + 2).unwrap_or("");
            if raw.is_empty() {
                continue;
            }
            let value: f64 = raw.parse().map_err(|e| {
                ReviewError::data_source(format!(
                    "row {}: invalid {} value: {}",
                    row + 1,
                    name,
                    e
                ))
            })?;
            factors.insert(name.clone(), value);
        }

        series.push(PricePoint {
            label: label.to_string(),
            price,
            factors,
        });
    }

    Ok(series)
}
