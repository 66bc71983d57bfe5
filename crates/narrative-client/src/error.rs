use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type NarrativeResult<T> = Result<T, NarrativeError>;
