//! Price series source port trait.

use crate::domain::error::ReviewError;
use crate::domain::price::PricePoint;

/// Supplies a time-ordered price series for one instrument.
pub trait PricePort {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, ReviewError>;
}
