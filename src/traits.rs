use crate::model::RawFormat;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unknown distribution/release: {0}")]
    UnknownDistribution(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to parse {format} response: {message}")]
    Parse { format: RawFormat, message: String },
    #[error("Lookup could not run: {0}")]
    Unavailable(String),
}

impl LookupError {
    pub fn parse(format: RawFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound("No results found.".to_string())
    }

    /// Normal negative outcomes, reported as a plain message rather than a failure.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::UnknownDistribution(_))
    }
}

/// Body and content type returned by a [`Fetcher`].
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a single GET of `url`. Implementations must not retry.
    async fn fetch(&self, url: &str) -> Result<Fetched, LookupError>;
}
