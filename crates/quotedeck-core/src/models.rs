use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quote model - the star of the show
///
/// Immutable once loaded. A quote is only worth displaying when both fields
/// are non-empty after trimming; everything downstream (store filtering,
/// engine display, preload selection) leans on `is_valid`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// The strict validity predicate: both fields present and non-empty
    /// once whitespace is stripped.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.author.trim().is_empty()
    }

    /// Identity for bookmark de-duplication.
    pub fn same_as(&self, other: &Quote) -> bool {
        self.text == other.text && self.author == other.author
    }
}

impl From<quotedeck_api::QuoteDto> for Quote {
    fn from(dto: quotedeck_api::QuoteDto) -> Self {
        Self {
            text: dto.text,
            author: dto.author,
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" — {}", self.text, self.author)
    }
}

/// A saved quote plus when it was saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkedQuote {
    pub quote: Quote,
    pub bookmarked_at: DateTime<Utc>,
}

impl BookmarkedQuote {
    pub fn new(quote: Quote) -> Self {
        Self {
            quote,
            bookmarked_at: Utc::now(),
        }
    }
}

/// Drop invalid entries from a freshly parsed list, logging what got cut.
pub fn filter_valid(quotes: Vec<Quote>) -> Vec<Quote> {
    let total = quotes.len();
    let valid: Vec<Quote> = quotes.into_iter().filter(Quote::is_valid).collect();

    if valid.len() < total {
        tracing::warn!(
            "Dropped {} invalid quotes out of {}",
            total - valid.len(),
            total
        );
    }

    valid
}
