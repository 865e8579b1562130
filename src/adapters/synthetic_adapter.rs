//! Random-walk price generator for bootstrapping and tests.
//!
//! Seeded, so the same settings always produce the same series.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::ReviewError;
use crate::domain::metrics::round2;
use crate::domain::price::PricePoint;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub days: usize,
    pub seed: u64,
    pub start_price: f64,
    pub floor: f64,
    pub min_move: f64,
    pub max_move: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            days: 365 * 3,
            seed: 0,
            start_price: 100.0,
            floor: 10.0,
            min_move: -2.5,
            max_move: 3.5,
        }
    }
}

impl SyntheticConfig {
    /// Read `[synthetic]`, falling back to defaults for absent keys.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let d = SyntheticConfig::default();
        SyntheticConfig {
            days: usize::try_from(config.get_int("synthetic", "days", 1095)).unwrap_or(d.days),
            seed: config
                .get_string("synthetic", "seed")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(d.seed),
            start_price: config.get_double("synthetic", "start_price", d.start_price),
            floor: config.get_double("synthetic", "floor", d.floor),
            min_move: config.get_double("synthetic", "min_move", d.min_move),
            max_move: config.get_double("synthetic", "max_move", d.max_move),
        }
    }
}

pub struct SyntheticAdapter {
    config: SyntheticConfig,
}

impl SyntheticAdapter {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Result<Vec<PricePoint>, ReviewError> {
        let c = &self.config;
        if !(c.min_move < c.max_move) {
            return Err(ReviewError::data_source(format!(
                "invalid move range [{}, {})",
                c.min_move, c.max_move
            )));
        }
        let mut rng = StdRng::seed_from_u64(c.seed);
        let mut price = c.start_price;
        let mut series = Vec::with_capacity(c.days);
        for day in 0..c.days {
            let step = rng.gen_range(c.min_move..c.max_move);
            price = round2(price + step);
            if price < c.floor {
                price = c.floor;
            }
            series.push(PricePoint::new(format!("day_{}", day + 1), price));
        }
        Ok(series)
    }
}

impl PricePort for SyntheticAdapter {
    fn fetch_series(&self, _symbol: &str) -> Result<Vec<PricePoint>, ReviewError> {
        self.generate()
    }
}
