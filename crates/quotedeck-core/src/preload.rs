// One-slot lookahead so the jump to the next quote feels instant
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::models::Quote;
use crate::store::QuoteStore;

/// A quote picked ahead of time, author line already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadedQuote {
    pub quote: Quote,
    pub author_line: String,
}

impl PreloadedQuote {
    fn new(quote: Quote) -> Self {
        let author_line = format!("— {}", quote.author);
        Self { quote, author_line }
    }
}

/// Single-item lookahead buffer.
///
/// `preload` fills the slot in the background after every `consume`; by the
/// time the user asks for the next quote, the pick (and its author line) is
/// already sitting there.
#[derive(Default)]
pub struct Preloader {
    slot: Option<PreloadedQuote>,
}

impl Preloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_filled(&self) -> bool {
        self.slot.is_some()
    }

    /// Fill the slot if it's empty. No-op otherwise.
    pub async fn preload(&mut self, store: &QuoteStore, current_text: Option<&str>) {
        if self.slot.is_some() {
            return;
        }

        if let Some(quote) = Self::pick(store, current_text).await {
            debug!("Preloaded next quote by {}", quote.author);
            self.slot = Some(PreloadedQuote::new(quote));
        }
    }

    /// Take the preloaded quote, falling back to an on-demand pick when the
    /// slot is empty. The caller should `preload` again afterwards.
    pub async fn consume(
        &mut self,
        store: &QuoteStore,
        current_text: Option<&str>,
    ) -> Option<PreloadedQuote> {
        if let Some(ready) = self.slot.take() {
            return Some(ready);
        }

        debug!("Preload slot empty, selecting on demand");
        Self::pick(store, current_text).await.map(PreloadedQuote::new)
    }

    /// Uniform random pick over the valid quotes, avoiding the currently
    /// displayed text when there's more than one candidate. Best effort
    /// only: with a single valid quote, repetition is unavoidable.
    async fn pick(store: &QuoteStore, current_text: Option<&str>) -> Option<Quote> {
        let outcome = store.load().await;
        let quotes = outcome.quotes;
        if quotes.is_empty() {
            return None;
        }

        let mut rng = rand::rng();

        if quotes.len() > 1 {
            if let Some(current) = current_text {
                let candidates: Vec<&Quote> =
                    quotes.iter().filter(|q| q.text != current).collect();
                if let Some(picked) = candidates.choose(&mut rng) {
                    return Some((*picked).clone());
                }
            }
        }

        quotes.choose(&mut rng).cloned()
    }
}
