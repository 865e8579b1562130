//! Domain error types.

/// Top-level error type for stratreview.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Malformed or incomplete strategy: missing condition groups, empty
    /// condition lists, unknown factors, non-numeric thresholds.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Runtime conditions preventing a valid result.
    #[error("simulation error: {reason}")]
    Simulation { reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReviewError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        ReviewError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn simulation(reason: impl Into<String>) -> Self {
        ReviewError::Simulation {
            reason: reason.into(),
        }
    }

    pub fn data_source(reason: impl Into<String>) -> Self {
        ReviewError::DataSource {
            reason: reason.into(),
        }
    }

    /// Taxonomy tag used when surfacing the error to a caller.
    pub fn category(&self) -> &'static str {
        match self {
            ReviewError::Configuration { .. } => "configuration",
            ReviewError::Simulation { .. } => "simulation",
            ReviewError::DataSource { .. } => "data-source",
            ReviewError::ConfigParse { .. }
            | ReviewError::ConfigMissing { .. }
            | ReviewError::ConfigInvalid { .. } => "settings",
            ReviewError::Json(_) | ReviewError::Io(_) => "internal",
        }
    }

    /// True for errors caused by caller input rather than processing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReviewError::Configuration { .. }
                | ReviewError::ConfigParse { .. }
                | ReviewError::ConfigMissing { .. }
                | ReviewError::ConfigInvalid { .. }
        )
    }
}

impl From<&ReviewError> for std::process::ExitCode {
    fn from(err: &ReviewError) -> Self {
        let code: u8 = match err {
            ReviewError::Io(_) => 1,
            ReviewError::ConfigParse { .. }
            | ReviewError::ConfigMissing { .. }
            | ReviewError::ConfigInvalid { .. } => 2,
            ReviewError::Configuration { .. } => 3,
            ReviewError::Simulation { .. } => 4,
            ReviewError::DataSource { .. } => 5,
            ReviewError::Json(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
