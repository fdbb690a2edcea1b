// Saved quotes: an ordered, de-duplicated collection with a cyclic cursor
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{BookmarkedQuote, Quote};
use quotedeck_cache::CacheManager;

/// The bookmark shelf.
///
/// Order is insertion order; the cursor cycles through it in both
/// directions, wrapping at the ends. Every mutation writes the whole
/// collection back through the cache so disk never lags memory.
pub struct BookmarkManager {
    items: Vec<BookmarkedQuote>,
    cursor: usize,
    cache: Option<Arc<CacheManager>>,
}

impl BookmarkManager {
    pub fn new(cache: Option<Arc<CacheManager>>) -> Self {
        let items = match &cache {
            Some(cache) => match cache.get_bookmarks::<BookmarkedQuote>() {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to load bookmarks: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            items,
            cursor: 0,
            cache,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[BookmarkedQuote] {
        &self.items
    }

    pub fn contains(&self, quote: &Quote) -> bool {
        self.items.iter().any(|b| b.quote.same_as(quote))
    }

    /// Add the quote if it isn't bookmarked yet, remove it if it is.
    /// Returns true when the quote ended up bookmarked.
    pub fn toggle(&mut self, quote: &Quote) -> bool {
        let bookmarked = match self.items.iter().position(|b| b.quote.same_as(quote)) {
            Some(index) => {
                self.items.remove(index);
                // Keep the cursor inside the shrunk collection.
                if !self.items.is_empty() {
                    self.cursor = self.cursor.min(self.items.len() - 1);
                } else {
                    self.cursor = 0;
                }
                debug!("Removed bookmark for {}", quote.author);
                false
            }
            None => {
                self.items.push(BookmarkedQuote::new(quote.clone()));
                debug!("Bookmarked quote by {}", quote.author);
                true
            }
        };

        self.persist();
        bookmarked
    }

    /// The bookmark at the cursor, advancing the cursor afterwards.
    /// `None` when the shelf is empty.
    pub fn cycle_next(&mut self) -> Option<BookmarkedQuote> {
        if self.items.is_empty() {
            return None;
        }
        let current = self.items[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.items.len();
        Some(current)
    }

    /// The bookmark at the cursor, retreating the cursor afterwards
    /// (wrapping below zero).
    pub fn cycle_previous(&mut self) -> Option<BookmarkedQuote> {
        if self.items.is_empty() {
            return None;
        }
        let current = self.items[self.cursor].clone();
        self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
        Some(current)
    }

    /// Rewrite the whole collection to disk. Failures are logged, never
    /// surfaced: losing a bookmark write is annoying, crashing over one
    /// is worse.
    fn persist(&self) {
        let Some(cache) = &self.cache else {
            return;
        };

        let rows: Vec<(String, String, i64, &BookmarkedQuote)> = self
            .items
            .iter()
            .map(|b| {
                (
                    b.quote.text.clone(),
                    b.quote.author.clone(),
                    b.bookmarked_at.timestamp(),
                    b,
                )
            })
            .collect();

        if let Err(e) = cache.save_bookmarks(&rows) {
            warn!("Failed to persist bookmarks: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> BookmarkManager {
        BookmarkManager::new(None)
    }

    fn quote(n: usize) -> Quote {
        Quote::new(format!("Quote {}", n), format!("Author {}", n))
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut bm = manager();
        assert!(bm.toggle(&quote(1)));
        assert!(bm.contains(&quote(1)));
        assert_eq!(bm.len(), 1);

        assert!(!bm.toggle(&quote(1)));
        assert!(!bm.contains(&quote(1)));
        assert!(bm.is_empty());
    }

    #[test]
    fn toggle_twice_is_idempotent_on_the_set() {
        let mut bm = manager();
        bm.toggle(&quote(1));
        bm.toggle(&quote(2));

        let before: Vec<Quote> = bm.items().iter().map(|b| b.quote.clone()).collect();
        bm.toggle(&quote(3));
        bm.toggle(&quote(3));
        let after: Vec<Quote> = bm.items().iter().map(|b| b.quote.clone()).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn no_duplicate_bookmarks_for_same_text_and_author() {
        let mut bm = manager();
        bm.toggle(&quote(1));
        // Toggling the same (text, author) again removes rather than dupes.
        bm.toggle(&quote(1));
        bm.toggle(&quote(1));
        assert_eq!(bm.len(), 1);
    }

    #[test]
    fn cycle_next_returns_to_start_after_len_steps() {
        for count in 1..=4 {
            let mut bm = manager();
            for n in 0..count {
                bm.toggle(&quote(n));
            }

            let first = bm.cycle_next().unwrap();
            for _ in 0..count - 1 {
                bm.cycle_next().unwrap();
            }
            let wrapped = bm.cycle_next().unwrap();
            assert_eq!(first, wrapped, "collection of {} bookmarks", count);
        }
    }

    #[test]
    fn cycle_previous_wraps_backwards() {
        let mut bm = manager();
        bm.toggle(&quote(0));
        bm.toggle(&quote(1));
        bm.toggle(&quote(2));

        // Cursor starts at 0; going backwards lands on 0 then wraps to 2.
        assert_eq!(bm.cycle_previous().unwrap().quote, quote(0));
        assert_eq!(bm.cycle_previous().unwrap().quote, quote(2));
        assert_eq!(bm.cycle_previous().unwrap().quote, quote(1));
    }

    #[test]
    fn cycle_on_empty_shelf_is_none() {
        let mut bm = manager();
        assert!(bm.cycle_next().is_none());
        assert!(bm.cycle_previous().is_none());
    }

    #[test]
    fn removing_clamps_the_cursor() {
        let mut bm = manager();
        bm.toggle(&quote(0));
        bm.toggle(&quote(1));
        bm.toggle(&quote(2));

        // Walk the cursor to the last slot.
        bm.cycle_next();
        bm.cycle_next();

        // Remove the last bookmark; cursor 2 must clamp to 1.
        bm.toggle(&quote(2));
        assert_eq!(bm.len(), 2);
        assert_eq!(bm.cycle_next().unwrap().quote, quote(1));
    }

    #[test]
    fn mutations_write_through_to_the_cache() {
        let cache = Arc::new(CacheManager::open_in_memory().unwrap());
        let mut bm = BookmarkManager::new(Some(cache.clone()));
        bm.toggle(&quote(1));
        bm.toggle(&quote(2));
        bm.toggle(&quote(1));

        // A fresh manager sees exactly what survived.
        let reloaded = BookmarkManager::new(Some(cache));
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(&quote(2)));
    }
}
