//! Domain error types.
//!
//! The analytics engine itself never fails; these errors only arise at the
//! I/O boundary (config files, data sources, report sinks).

/// Top-level error type for tradelens.
#[derive(Debug, thiserror::Error)]
pub enum TradelensError {
    #[error("failed to read {source_name}: {reason}")]
    DataRead { source_name: String, reason: String },

    #[error("malformed data in {source_name}: {reason}")]
    DataFormat { source_name: String, reason: String },

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

    #[error("failed to write report to {target}: {reason}")]
    ReportWrite { target: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradelensError> for std::process::ExitCode {
    fn from(err: &TradelensError) -> Self {
        let code: u8 = match err {
            TradelensError::Io(_) => 1,
            TradelensError::ConfigParse { .. }
            | TradelensError::ConfigMissing { .. }
            | TradelensError::ConfigInvalid { .. } => 2,
            TradelensError::DataRead { .. } | TradelensError::DataFormat { .. } => 3,
            TradelensError::ReportWrite { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
