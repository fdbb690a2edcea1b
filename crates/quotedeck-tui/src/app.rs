// TUI application state and command handling
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use quotedeck_core::store::EMPTY_COLLECTION_MESSAGE;
use quotedeck_core::{share, BookmarkManager, EngineRequest, Preloader, Quote, QuoteStore, TypingEngine};

/// Two logical actions from one physical gesture is the bug this guards
/// against: any trigger inside the window after the last one is dropped.
const ACTION_COOLDOWN: Duration = Duration::from_millis(100);

/// How many replacement quotes we'll chase before giving up. Selection runs
/// over the validated list, so more than one bounce means the list is bad.
const MAX_REPLACEMENT_ATTEMPTS: usize = 5;

/// Logical actions the key dispatcher can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tap / space: force-finish while typing, pause toggle otherwise.
    Interact,
    /// Skip straight to a fresh random quote.
    NextQuote,
    /// Copy the current quote to the clipboard.
    CopyQuote,
    /// Copy the share string to the clipboard.
    Share,
    /// Flip between normal and uppercase rendering.
    CaseToggle,
    /// Bookmark or un-bookmark the current quote.
    BookmarkToggle,
    /// Show the next saved quote.
    BookmarkNext,
    /// Show the previous saved quote.
    BookmarkPrevious,
    /// Freeze/unfreeze the reveal in place (long-press analog).
    PauseToggle,
    Quit,
}

/// Map a pressed character to a command. Single-letter bindings are
/// case-insensitive.
pub fn command_for_char(c: char) -> Option<Command> {
    match c.to_ascii_lowercase() {
        ' ' => Some(Command::Interact),
        'n' => Some(Command::NextQuote),
        'c' => Some(Command::CopyQuote),
        's' => Some(Command::Share),
        'u' => Some(Command::CaseToggle),
        'b' => Some(Command::BookmarkToggle),
        'v' => Some(Command::BookmarkNext),
        'p' => Some(Command::PauseToggle),
        'q' => Some(Command::Quit),
        _ => None,
    }
}

pub struct App {
    pub should_quit: bool,
    pub engine: TypingEngine,
    pub preloader: Preloader,
    pub bookmarks: BookmarkManager,
    store: QuoteStore,
    pub author_line: String,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub uppercase: bool,
    last_action: Option<Instant>,
}

impl App {
    pub fn new(
        store: QuoteStore,
        bookmarks: BookmarkManager,
        reduced_motion: bool,
        uppercase: bool,
    ) -> Self {
        Self {
            should_quit: false,
            engine: TypingEngine::new(reduced_motion),
            preloader: Preloader::new(),
            bookmarks,
            store,
            author_line: String::new(),
            error_message: None,
            status_message: None,
            uppercase,
            last_action: None,
        }
    }

    /// Re-entrancy lock: returns false (and swallows the trigger) when the
    /// previous action's cooldown window is still open.
    pub fn accept_action(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_action {
            if now.duration_since(last) < ACTION_COOLDOWN {
                debug!("Dropping action inside the cooldown window");
                return false;
            }
        }
        self.last_action = Some(now);
        true
    }

    /// The quote text as rendered, honoring the case toggle.
    pub fn visible_text(&self) -> String {
        let text = self
            .engine
            .session()
            .map(|s| s.visible_text().to_string())
            .unwrap_or_default();
        if self.uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }

    pub fn current_quote(&self) -> Option<&Quote> {
        self.engine.session().map(|s| &s.quote)
    }

    /// Plain `"text" — author` for the copy binding.
    pub fn copy_payload(&self) -> Option<String> {
        self.current_quote().map(|q| q.to_string())
    }

    /// Share string with markdown links stripped.
    pub fn share_payload(&self) -> Option<String> {
        self.current_quote().map(share::share_text)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// First load + first quote + warm the preload slot.
    pub async fn start(&mut self, now: Instant) {
        let outcome = self.store.load().await;
        self.error_message = outcome.error.clone();
        if outcome.quotes.is_empty() {
            return;
        }
        self.show_next_quote(now).await;
    }

    /// Handle one logical command. Clipboard commands are resolved by the
    /// runner (it owns the clipboard handle); everything else lands here.
    pub async fn handle_command(&mut self, command: Command, now: Instant) {
        self.status_message = None;

        match command {
            Command::Quit => self.should_quit = true,
            Command::Interact => {
                if let Some(EngineRequest::NextQuote) = self.engine.interact() {
                    self.show_next_quote(now).await;
                }
            }
            Command::NextQuote => self.show_next_quote(now).await,
            Command::PauseToggle => {
                if self.engine.is_typing() {
                    self.engine.pause();
                    self.set_status("Paused");
                } else if self.engine.is_paused() {
                    self.engine.resume(now);
                    self.set_status("Resumed");
                }
            }
            Command::CaseToggle => {
                self.uppercase = !self.uppercase;
            }
            Command::BookmarkToggle => {
                let Some(quote) = self.current_quote().cloned() else {
                    return;
                };
                if self.bookmarks.toggle(&quote) {
                    self.set_status("Bookmarked");
                } else {
                    self.set_status("Bookmark removed");
                }
            }
            Command::BookmarkNext => {
                match self.bookmarks.cycle_next() {
                    Some(bookmark) => self.show_bookmark(bookmark.quote, now),
                    None => self.set_status("No bookmarks yet"),
                }
            }
            Command::BookmarkPrevious => {
                match self.bookmarks.cycle_previous() {
                    Some(bookmark) => self.show_bookmark(bookmark.quote, now),
                    None => self.set_status("No bookmarks yet"),
                }
            }
            // Clipboard commands are the runner's business.
            Command::CopyQuote | Command::Share => {}
        }
    }

    /// Drive the engine's clock forward; a fired advance means it's time
    /// for the next quote.
    pub async fn tick(&mut self, now: Instant) {
        if let Some(EngineRequest::NextQuote) = self.engine.tick(now) {
            self.show_next_quote(now).await;
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    /// Pull the next quote out of the preload slot (or select on demand),
    /// hand it to the engine, and refill the slot in the background sense -
    /// everything here is cooperative, so "background" just means "after
    /// the display starts".
    async fn show_next_quote(&mut self, now: Instant) {
        for _ in 0..MAX_REPLACEMENT_ATTEMPTS {
            let current = self.current_quote().map(|q| q.text.clone());
            let Some(next) = self
                .preloader
                .consume(&self.store, current.as_deref())
                .await
            else {
                // Nothing valid to show: report on both surfaces, stay idle.
                self.engine.clear();
                self.author_line.clear();
                self.error_message = Some(EMPTY_COLLECTION_MESSAGE.to_string());
                return;
            };

            let request = self.engine.display(next.quote.clone(), 0, false, now);
            if request.is_none() {
                self.author_line = next.author_line;
                self.error_message = None;
                let displayed = next.quote.text;
                self.preloader.preload(&self.store, Some(&displayed)).await;
                return;
            }

            // Engine refused the quote; log and pick a replacement.
            warn!("Engine rejected quote by {}, retrying", next.quote.author);
        }

        self.engine.clear();
        self.author_line.clear();
        self.error_message = Some(EMPTY_COLLECTION_MESSAGE.to_string());
    }

    /// Saved quotes appear instantly; re-typing something the user already
    /// read would just be friction.
    fn show_bookmark(&mut self, quote: Quote, now: Instant) {
        if self.engine.display(quote, 0, true, now).is_some() {
            // A bookmark that fails validation should never have been saved.
            self.error_message = Some("Could not display bookmark".to_string());
            return;
        }
        if let Some(q) = self.current_quote() {
            self.author_line = format!("— {}", q.author);
        }
        self.error_message = None;
    }
}
