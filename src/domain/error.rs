//! Domain error types.

/// Top-level error type for macdtrader.
#[derive(Debug, thiserror::Error)]
pub enum MacdError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("empty input: price series has no entries")]
    EmptyInput,

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("misaligned series: {reason}")]
    Misaligned { reason: String },

    #[error("data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("{statistic} is undefined: {reason}")]
    Undefined { statistic: String, reason: String },

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
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MacdError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        MacdError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        MacdError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MacdError> for std::process::ExitCode {
    fn from(err: &MacdError) -> Self {
        let code: u8 = match err {
            MacdError::Io(_) | MacdError::Csv(_) => 1,
            MacdError::ConfigParse { .. }
            | MacdError::ConfigMissing { .. }
            | MacdError::ConfigInvalid { .. }
            | MacdError::InvalidParameter { .. } => 2,
            MacdError::DataUnavailable { .. }
            | MacdError::EmptyInput
            | MacdError::InvalidSeries { .. } => 5,
            MacdError::Misaligned { .. } | MacdError::Undefined { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
