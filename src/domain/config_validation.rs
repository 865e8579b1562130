//! Settings file validation.
//!
//! Validates all INI fields before a simulation runs.

use crate::domain::error::ReviewError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    validate_initial_cash(config)?;
    validate_excerpt_len(config)?;
    Ok(())
}

pub fn validate_synthetic_config(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    validate_days(config)?;
    validate_seed(config)?;
    validate_start_price(config)?;
    validate_moves(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ReviewError {
    ReviewError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A present value must parse; an absent one is fine.
fn check_numeric<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), ReviewError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<T>().is_err() => {
            Err(invalid(section, key, &format!("'{raw}' is not a valid number")))
        }
        _ => Ok(()),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<f64>(config, "simulation", "initial_cash")?;
    let value = config.get_double("simulation", "initial_cash", 100_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "simulation",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_excerpt_len(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<i64>(config, "simulation", "excerpt_len")?;
    let value = config.get_int("simulation", "excerpt_len", 5);
    if value < 1 {
        return Err(invalid(
            "simulation",
            "excerpt_len",
            "excerpt_len must be at least 1",
        ));
    }
    Ok(())
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<i64>(config, "synthetic", "days")?;
    let value = config.get_int("synthetic", "days", 1);
    if value < 1 {
        return Err(invalid("synthetic", "days", "days must be at least 1"));
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<u64>(config, "synthetic", "seed")
}

fn validate_start_price(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<f64>(config, "synthetic", "start_price")?;
    let value = config.get_double("synthetic", "start_price", 100.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "synthetic",
            "start_price",
            "start_price must be positive",
        ));
    }
    check_numeric::<f64>(config, "synthetic", "floor")?;
    if config.get_double("synthetic", "floor", 10.0) < 0.0 {
        return Err(invalid("synthetic", "floor", "floor must be non-negative"));
    }
    Ok(())
}

fn validate_moves(config: &dyn ConfigPort) -> Result<(), ReviewError> {
    check_numeric::<f64>(config, "synthetic", "min_move")?;
    check_numeric::<f64>(config, "synthetic", "max_move")?;
    let min = config.get_double("synthetic", "min_move", -2.5);
    let max = config.get_double("synthetic", "max_move", 3.5);
    if !(min < max) {
        return Err(invalid(
            "synthetic",
            "min_move",
            "min_move must be less than max_move",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_simulation_config_passes() {
        let config = make_config("[simulation]\ninitial_cash = 50000\nexcerpt_len = 10\n");
        assert!(validate_simulation_config(&config).is_ok());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = make_config("");
        assert!(validate_simulation_config(&config).is_ok());
        assert!(validate_synthetic_config(&config).is_ok());
    }

    #[test]
    fn initial_cash_zero_fails() {
        let config = make_config("[simulation]\ninitial_cash = 0\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn initial_cash_non_numeric_fails() {
        let config = make_config("[simulation]\ninitial_cash = lots\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn excerpt_len_zero_fails() {
        let config = make_config("[simulation]\nexcerpt_len = 0\n");
        let err = validate_simulation_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "excerpt_len"));
    }

    #[test]
    fn valid_synthetic_config_passes() {
        let config = make_config(
            r#"
[synthetic]
days = 250
seed = 42
start_price = 50.0
floor = 5.0
min_move = -1.0
max_move = 1.5
"#,
        );
        assert!(validate_synthetic_config(&config).is_ok());
    }

    #[test]
    fn days_zero_fails() {
        let config = make_config("[synthetic]\ndays = 0\n");
        let err = validate_synthetic_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "days"));
    }

    #[test]
    fn negative_seed_fails() {
        let config = make_config("[synthetic]\nseed = -1\n");
        let err = validate_synthetic_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "seed"));
    }

    #[test]
    fn inverted_moves_fail() {
        let config = make_config("[synthetic]\nmin_move = 2.0\nmax_move = 1.0\n");
        let err = validate_synthetic_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "min_move"));
    }

    #[test]
    fn negative_floor_fails() {
        let config = make_config("[synthetic]\nfloor = -3\n");
        let err = validate_synthetic_config(&config).unwrap_err();
        assert!(matches!(err, ReviewError::ConfigInvalid { key, .. } if key == "floor"));
    }
}
