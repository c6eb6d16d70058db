//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeMatchError>;

impl From<reqwest::Error> for ResumeMatchError {
    fn from(err: reqwest::Error) -> Self {
        ResumeMatchError::Network(err.to_string())
    }
}

impl ResumeMatchError {
    /// True for failures of the external completion call itself, which every
    /// pipeline stage absorbs with its own fallback.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            ResumeMatchError::Completion(_)
                | ResumeMatchError::Network(_)
                | ResumeMatchError::MalformedResponse(_)
        )
    }
}
