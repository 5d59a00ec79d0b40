use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    /// Content that the line passes cannot splice safely. Reported per locale,
    /// never fatal to a whole run.
    #[error("{0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;
