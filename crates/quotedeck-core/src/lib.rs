// Core business logic lives here - the brain of the operation
pub mod bookmarks;
pub mod config;
pub mod error;
pub mod models;
pub mod pacing;
pub mod preload;
pub mod share;
pub mod store;
pub mod typing;

pub use bookmarks::BookmarkManager;
pub use config::Config;
pub use error::Error;
pub use models::{BookmarkedQuote, Quote};
pub use preload::{PreloadedQuote, Preloader};
pub use store::{LoadOutcome, QuoteFetcher, QuoteStore, RemoteQuoteFetcher};
pub use typing::{EngineRequest, TypingEngine};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
