// Durable local state: the time-boxed quote cache and the bookmark shelf
pub mod cache;

pub use cache::{CacheError, CacheManager, QUOTE_LIST_KEY};
