// Quote loading with a cache-first strategy
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{filter_valid, Quote};
use crate::Result;
use quotedeck_cache::{CacheManager, QUOTE_LIST_KEY};

/// Shown on the error surface when the quote list cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load quotes. Check your connection and try again.";
/// Shown when the list loads but contains nothing displayable.
pub const EMPTY_COLLECTION_MESSAGE: &str = "No quotes available.";

/// Trait for quote sources - makes testing easier and keeps things flexible
///
/// The real implementation wraps the HTTP client; tests swap in a mock so
/// cache-freshness behavior can be asserted without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QuoteFetcher: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>>;
}

/// Production fetcher backed by `quotedeck_api::QuoteClient`.
pub struct RemoteQuoteFetcher {
    client: quotedeck_api::QuoteClient,
}

impl RemoteQuoteFetcher {
    pub fn new(client: quotedeck_api::QuoteClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl QuoteFetcher for RemoteQuoteFetcher {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let dtos = self.client.fetch_quotes().await?;
        Ok(dtos.into_iter().map(Quote::from).collect())
    }
}

/// What a load produced. `load` itself never fails; trouble shows up as an
/// empty list plus a message for the error surface.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub quotes: Vec<Quote>,
    pub error: Option<String>,
    pub from_cache: bool,
}

impl LoadOutcome {
    fn fresh(quotes: Vec<Quote>, from_cache: bool) -> Self {
        let error = if quotes.is_empty() {
            Some(EMPTY_COLLECTION_MESSAGE.to_string())
        } else {
            None
        };
        Self {
            quotes,
            error,
            from_cache,
        }
    }

    fn failed() -> Self {
        Self {
            quotes: Vec::new(),
            error: Some(LOAD_ERROR_MESSAGE.to_string()),
            from_cache: false,
        }
    }
}

/// Loads, validates, and caches the quote list.
pub struct QuoteStore {
    fetcher: Box<dyn QuoteFetcher>,
    cache: Option<Arc<CacheManager>>,
    ttl_secs: i64,
}

impl QuoteStore {
    pub fn new(fetcher: Box<dyn QuoteFetcher>, cache: Option<Arc<CacheManager>>, ttl_hours: u64) -> Self {
        Self {
            fetcher,
            cache,
            ttl_secs: (ttl_hours as i64) * 3600,
        }
    }

    /// Load the quote list: fresh cache wins, otherwise one fetch.
    ///
    /// Any failure (network, parse, schema) is caught and reported through
    /// the outcome's error message; callers always get a list back.
    pub async fn load(&self) -> LoadOutcome {
        if let Some(cached) = self.cached_quotes() {
            debug!("Quote cache is fresh, skipping fetch");
            return LoadOutcome::fresh(cached, true);
        }

        match self.fetcher.fetch_quotes().await {
            Ok(raw) => {
                let quotes = filter_valid(raw);
                info!("Fetched {} valid quotes", quotes.len());

                // Overwrite the cache unconditionally with a fresh timestamp.
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.set_blob(QUOTE_LIST_KEY, &quotes) {
                        warn!("Failed to cache quote list: {}", e);
                    }
                }

                LoadOutcome::fresh(quotes, false)
            }
            Err(e) => {
                warn!("Quote load failed: {}", e);
                LoadOutcome::failed()
            }
        }
    }

    fn cached_quotes(&self) -> Option<Vec<Quote>> {
        let cache = self.cache.as_ref()?;
        match cache.get_blob::<Vec<Quote>>(QUOTE_LIST_KEY, self.ttl_secs) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Quote cache read failed: {}", e);
                None
            }
        }
    }
}
