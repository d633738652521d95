use thiserror::Error;

/// Top-level error type for the Sikkim assistant.
///
/// Subsystem crates define their own error types and implement
/// `From<SikkimError>` so that the `?` operator works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SikkimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SikkimError {
    fn from(err: toml::de::Error) -> Self {
        SikkimError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SikkimError {
    fn from(err: toml::ser::Error) -> Self {
        SikkimError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SikkimError {
    fn from(err: serde_json::Error) -> Self {
        SikkimError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sikkim operations.
pub type Result<T> = std::result::Result<T, SikkimError>;
