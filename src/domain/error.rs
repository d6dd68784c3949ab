//! Domain error types.

/// Top-level error type for activedca.
#[derive(Debug, thiserror::Error)]
pub enum ActiveDcaError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("data file not found: {path}")]
    DataNotFound { path: String },

    #[error("data parse error: {reason}")]
    DataParse { reason: String },

    #[error("no samples in {path}")]
    NoData { path: String },

    #[error("indicator fetch failed: {reason}")]
    IndicatorFetch { reason: String },

    #[error("insufficient price history: have {have} points, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ActiveDcaError {
    /// Process exit status for this error kind.
    pub fn exit_status(&self) -> u8 {
        match self {
            ActiveDcaError::Io(_) | ActiveDcaError::Report { .. } => 1,
            ActiveDcaError::ConfigParse { .. }
            | ActiveDcaError::ConfigInvalid { .. } => 2,
            ActiveDcaError::IndicatorFetch { .. } => 3,
            ActiveDcaError::InvalidInput { .. } => 4,
            ActiveDcaError::DataNotFound { .. }
            | ActiveDcaError::DataParse { .. }
            | ActiveDcaError::NoData { .. }
            | ActiveDcaError::InsufficientHistory { .. } => 5,
        }
    }
}

impl From<&ActiveDcaError> for std::process::ExitCode {
    fn from(err: &ActiveDcaError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_share_exit_code() {
        let parse = ActiveDcaError::ConfigParse {
            file: "activedca.ini".into(),
            reason: "unterminated section header".into(),
        };
        let invalid = ActiveDcaError::ConfigInvalid {
            section: "strategy".into(),
            key: "stop_investing".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(parse.exit_status(), 2);
        assert_eq!(invalid.exit_status(), 2);
    }

    #[test]
    fn data_not_found_is_distinct_from_io() {
        let not_found = ActiveDcaError::DataNotFound {
            path: "historical_data.csv".into(),
        };
        let io = ActiveDcaError::Io(std::io::Error::other("disk full"));
        assert_eq!(not_found.exit_status(), 5);
        assert_ne!(not_found.exit_status(), io.exit_status());
    }

    #[test]
    fn display_messages() {
        let err = ActiveDcaError::InsufficientHistory { have: 150, need: 200 };
        assert_eq!(
            err.to_string(),
            "insufficient price history: have 150 points, need 200"
        );

        let err = ActiveDcaError::ConfigInvalid {
            section: "strategy".into(),
            key: "invest_percentage".into(),
            reason: "must be between 0 and 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] invest_percentage: must be between 0 and 1"
        );
    }
}
