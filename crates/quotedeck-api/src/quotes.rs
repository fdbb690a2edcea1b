use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry, RetryConfig};

const DEFAULT_QUOTES_URL: &str =
    "https://raw.githubusercontent.com/shreeshjha/quotedeck/main/quotes.json";

#[derive(Error, Debug)]
pub enum QuoteClientError {
    #[error("Quote resource request failed: {0}")]
    RequestFailed(String),

    #[error("Quote resource not found at {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuoteClientError>;

/// One element of the remote quote array, exactly as it appears on the wire.
///
/// Validation (non-empty text/author after trimming) happens in core, not
/// here - the client's job is just to get the bytes parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteDto {
    pub text: String,
    pub author: String,
}

/// Client for the static quote resource.
///
/// The resource is a single unauthenticated JSON array, so this is the
/// simplest client imaginable: one GET, one parse, retry on transient
/// failures.
pub struct QuoteClient {
    client: reqwest::Client,
    url: String,
    retry_config: RetryConfig,
}

impl QuoteClient {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_QUOTES_URL.to_string())
    }

    /// Point the client at a different quote resource.
    pub fn with_url(url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("quotedeck/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            client,
            url,
            retry_config: RetryConfig::default(),
        }
    }

    /// Create a client with custom retry configuration.
    pub fn with_retry_config(url: String, retry_config: RetryConfig) -> Self {
        let mut client = Self::with_url(url);
        client.retry_config = retry_config;
        client
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the full quote array.
    pub async fn fetch_quotes(&self) -> Result<Vec<QuoteDto>> {
        with_retry(&self.retry_config, || async {
            let response = self.client.get(&self.url).send().await?;

            if response.status() == 404 {
                return Err(QuoteClientError::NotFound(self.url.clone()));
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                let transient = if is_retryable_status(status) {
                    " (transient)"
                } else {
                    ""
                };
                return Err(QuoteClientError::RequestFailed(format!(
                    "Status {}{}: {}",
                    status, transient, body
                )));
            }

            let quotes: Vec<QuoteDto> = response.json().await?;
            Ok(quotes)
        })
        .await
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}
