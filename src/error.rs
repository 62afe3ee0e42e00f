use std::path::PathBuf;
use thiserror::Error;

/// Reference data could not be loaded. Fatal: the tool refuses to take input.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model bundle: {0}")]
    InvalidBundle(String),

    #[error("meal table has no entry for the default diet label '{0}'")]
    MissingDefaultLabel(String),
}

/// Body measurements the calculator cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("height must be a positive number of centimetres (got {0})")]
    Height(f64),

    #[error("weight must be a positive number of kilograms (got {0})")]
    Weight(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The profile could not be turned into the model's feature vector.
    #[error("could not encode profile: {0}")]
    Encoding(String),

    /// The model itself failed to produce a label.
    #[error("diet classification failed: {0}")]
    Classification(String),
}

/// Anything that halts a single recommendation request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

#[derive(Debug, Error)]
pub enum AuditWriteError {
    #[error("audit log write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}
