//! Price series representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ReviewError;

/// One simulated period: a label and the price observed in it.
///
/// `factors` carries optional named signals supplied by the data source
/// (e.g. `PE_TTM`), referenced by custom rule conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub label: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub factors: BTreeMap<String, f64>,
}

impl PricePoint {
    pub fn new(label: impl Into<String>, price: f64) -> Self {
        PricePoint {
            label: label.into(),
            price,
            factors: BTreeMap::new(),
        }
    }

    pub fn with_factor(mut self, name: impl Into<String>, value: f64) -> Self {
        self.factors.insert(name.into(), value);
        self
    }

    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.get(name).copied()
    }
}

/// Build a series from bare prices, labelled `day_1..day_N`.
pub fn series_from_prices(prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(format!("day_{}", i + 1), p))
        .collect()
}

/// Reject series the engine cannot simulate over.
pub fn validate_series(series: &[PricePoint]) -> Result<(), ReviewError> {
    if series.is_empty() {
        return Err(ReviewError::simulation("price series is empty"));
    }
    for point in series {
        if !point.price.is_finite() || point.price < 0.0 {
            return Err(ReviewError::simulation(format!(
                "invalid price {} at {}",
                point.price, point.label
            )));
        }
        if let Some((name, value)) = point.factors.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ReviewError::simulation(format!(
                "non-finite factor {name} = {value} at {}",
                point.label
            )));
        }
    }
    Ok(())
}
