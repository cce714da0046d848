//! Settings error types.

use thiserror::Error;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors produced while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON in the expected shape.
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        /// File path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override has an unparseable value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnvValue {
        /// Environment variable name.
        var: &'static str,
        /// The offending value.
        value: String,
    },
}
