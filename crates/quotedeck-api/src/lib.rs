// HTTP client for the remote quote resource
pub mod quotes;
pub mod retry;

// Re-export common types
pub use quotes::{QuoteClient, QuoteClientError, QuoteDto};
pub use retry::RetryConfig;
