use thiserror::Error;

/// Errors a data provider can fail with. All of them are recoverable at the
/// collection boundary: the collector logs the error and lets the affected
/// fields fall back to [`crate::FALLBACK_VALUE`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("Missing data: {0}")]
    MissingData(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
