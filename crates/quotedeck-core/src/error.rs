use thiserror::Error;

/// All the ways things can go wrong in quotedeck
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load quotes: {0}")]
    LoadFailure(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("No quotes available")]
    EmptyCollection,

    #[error("Failed to render quote: {0}")]
    RenderFailure(String),

    #[error("Cache operation failed: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quotedeck_cache::CacheError> for Error {
    fn from(err: quotedeck_cache::CacheError) -> Self {
        Error::CacheError(err.to_string())
    }
}

impl From<quotedeck_api::QuoteClientError> for Error {
    fn from(err: quotedeck_api::QuoteClientError) -> Self {
        Error::LoadFailure(err.to_string())
    }
}
