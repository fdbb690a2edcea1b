// The typewriter state machine: Idle -> Typing -> Paused <-> Typing ->
// Complete -> (delay) -> next quote.
use std::time::Instant;

use tracing::debug;

use crate::models::Quote;
use crate::pacing;

/// What the engine wants its owner to do next.
///
/// The engine never fetches quotes itself; it hands a request back to the
/// controller, which consults the preloader and calls `display` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRequest {
    /// Start displaying a fresh random quote.
    NextQuote,
}

/// What a pending deadline will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    /// Reveal one more character.
    Reveal,
    /// Post-completion delay elapsed; move on to the next quote.
    Advance,
}

/// The single outstanding timer. Owning exactly one of these (inside an
/// Option) is what guarantees two reveal loops can never run at once: every
/// transition takes the old one out before installing a new one.
#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: Instant,
    action: PendingAction,
}

/// Transient state for the quote currently on screen.
#[derive(Debug, Clone)]
pub struct TypingSession {
    pub quote: Quote,
    /// Characters revealed so far (char count, not bytes).
    pub revealed: usize,
    /// Byte offset matching `revealed`, kept so rendering can slice cheaply.
    revealed_bytes: usize,
    pub is_paused: bool,
    pub is_complete: bool,
}

impl TypingSession {
    fn new(quote: Quote, start_index: usize) -> Self {
        let total = quote.text.chars().count();
        let revealed = start_index.min(total);
        let revealed_bytes = byte_offset(&quote.text, revealed);
        Self {
            quote,
            revealed,
            revealed_bytes,
            is_paused: false,
            is_complete: false,
        }
    }

    pub fn total_chars(&self) -> usize {
        self.quote.text.chars().count()
    }

    /// The prefix of the quote revealed so far.
    pub fn visible_text(&self) -> &str {
        &self.quote.text[..self.revealed_bytes]
    }

    fn reveal_one(&mut self) {
        if let Some(c) = self.quote.text[self.revealed_bytes..].chars().next() {
            self.revealed += 1;
            self.revealed_bytes += c.len_utf8();
        }
    }

    fn reveal_all(&mut self) {
        self.revealed = self.total_chars();
        self.revealed_bytes = self.quote.text.len();
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// The typing engine proper.
///
/// Purely cooperative: nothing runs on its own. The owner polls
/// `next_deadline()` to learn how long it may sleep, then calls `tick(now)`
/// when a deadline passes. All user input arrives through `interact`,
/// `pause`/`resume`, and `display`.
pub struct TypingEngine {
    session: Option<TypingSession>,
    pending: Option<PendingTimer>,
    is_typing: bool,
    reduced_motion: bool,
    char_delay: std::time::Duration,
}

impl TypingEngine {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            session: None,
            pending: None,
            is_typing: false,
            reduced_motion,
            char_delay: std::time::Duration::ZERO,
        }
    }

    pub fn session(&self) -> Option<&TypingSession> {
        self.session.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().map(|s| s.is_paused).unwrap_or(false)
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// When the owner should call `tick` next, if at all.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Drop the outstanding timer, if any.
    ///
    /// Every transition away from Typing funnels through here first; leaving
    /// a stale timer behind is the classic double-speed-reveal bug.
    fn cancel_pending(&mut self) -> Option<PendingTimer> {
        self.pending.take()
    }

    fn schedule(&mut self, now: Instant, delay: std::time::Duration, action: PendingAction) {
        // Replace, never stack.
        self.pending = Some(PendingTimer {
            due: now + delay,
            action,
        });
    }

    /// Begin displaying a quote from `start_index`.
    ///
    /// Invalid quotes are never rendered; the engine asks for a replacement
    /// instead. `finish_immediately` (or reduced motion, which is treated
    /// identically) skips the animation.
    pub fn display(
        &mut self,
        quote: Quote,
        start_index: usize,
        finish_immediately: bool,
        now: Instant,
    ) -> Option<EngineRequest> {
        self.cancel_pending();

        if !quote.is_valid() {
            debug!("Refusing to display invalid quote, requesting replacement");
            self.session = None;
            self.is_typing = false;
            return Some(EngineRequest::NextQuote);
        }

        // A paused engine doesn't animate: new quotes land fully revealed
        // until the user unpauses.
        let inherited_pause = self.is_paused();

        self.char_delay = pacing::char_delay(&quote.text, self.reduced_motion);
        self.session = Some(TypingSession::new(quote, start_index));
        self.is_typing = true;

        if finish_immediately || inherited_pause || self.char_delay.is_zero() {
            self.force_finish();
            // Under reduced motion the post-completion pause is zero, so the
            // owner still gets a chance to advance; force_finish leaves the
            // session paused, which holds it on screen until the user acts.
        } else {
            self.schedule(now, self.char_delay, PendingAction::Reveal);
        }

        None
    }

    /// Advance the machine. Call when `next_deadline()` has passed.
    pub fn tick(&mut self, now: Instant) -> Option<EngineRequest> {
        let Some(pending) = self.pending else {
            return None;
        };
        if now < pending.due {
            return None;
        }

        // Consume the timer before acting on it.
        self.cancel_pending();

        match pending.action {
            PendingAction::Reveal => {
                let Some(session) = self.session.as_mut() else {
                    return None;
                };

                session.reveal_one();

                if session.revealed >= session.total_chars() {
                    // Natural completion.
                    session.is_complete = true;
                    self.is_typing = false;
                    self.schedule(
                        now,
                        pacing::advance_delay(self.reduced_motion),
                        PendingAction::Advance,
                    );
                } else {
                    self.schedule(now, self.char_delay, PendingAction::Reveal);
                }
                None
            }
            PendingAction::Advance => {
                // Only advance if the user hasn't paused in the meantime.
                if self.is_paused() {
                    None
                } else {
                    Some(EngineRequest::NextQuote)
                }
            }
        }
    }

    /// Render the rest of the quote at once.
    ///
    /// This is the only non-user path that sets `is_paused`: a force-finished
    /// quote stays on screen until the user unpauses or asks for the next.
    pub fn force_finish(&mut self) {
        self.cancel_pending();

        if let Some(session) = self.session.as_mut() {
            session.reveal_all();
            session.is_complete = true;
            session.is_paused = true;
        }
        self.is_typing = false;
    }

    /// Tap / space handler.
    ///
    /// Mid-reveal it finishes the quote instantly (no pause toggle). When the
    /// reveal is done it toggles pause, and the paused -> unpaused edge asks
    /// for the next quote right away.
    pub fn interact(&mut self) -> Option<EngineRequest> {
        if self.session.is_none() {
            return None;
        }

        if self.is_typing && !self.is_paused() {
            self.force_finish();
            return None;
        }

        let was_paused = self.is_paused();
        if let Some(session) = self.session.as_mut() {
            session.is_paused = !was_paused;
        }

        if was_paused {
            // Unpausing a finished quote means "show me another one".
            self.cancel_pending();
            Some(EngineRequest::NextQuote)
        } else {
            None
        }
    }

    /// Freeze the reveal at the current index (long-press surface).
    pub fn pause(&mut self) {
        if !self.is_typing {
            return;
        }
        self.cancel_pending();
        self.is_typing = false;
        if let Some(session) = self.session.as_mut() {
            session.is_paused = true;
        }
    }

    /// Continue a paused reveal from the exact index it stopped at.
    pub fn resume(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_paused || session.is_complete {
            return;
        }

        session.is_paused = false;
        self.is_typing = true;
        self.cancel_pending();
        if self.char_delay.is_zero() {
            self.force_finish();
        } else {
            self.schedule(now, self.char_delay, PendingAction::Reveal);
        }
    }

    /// Tear down the current session, timer included.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.session = None;
        self.is_typing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quote(text: &str) -> Quote {
        Quote::new(text, "Tester")
    }

    /// Run the engine to quiescence, jumping time forward to each deadline.
    fn run_until_idle(engine: &mut TypingEngine, mut now: Instant) -> Vec<EngineRequest> {
        let mut requests = Vec::new();
        while let Some(due) = engine.next_deadline() {
            now = due;
            if let Some(req) = engine.tick(now) {
                requests.push(req);
                break;
            }
        }
        requests
    }

    #[test]
    fn invalid_quote_requests_replacement() {
        let mut engine = TypingEngine::new(false);
        let req = engine.display(Quote::new("", "B"), 0, false, Instant::now());
        assert_eq!(req, Some(EngineRequest::NextQuote));
        assert!(engine.session().is_none());
        assert!(!engine.is_typing());
        assert!(engine.next_deadline().is_none());
    }

    #[test]
    fn reveals_one_character_per_tick() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hi!"), 0, false, now);
        assert!(engine.is_typing());
        assert_eq!(engine.session().unwrap().visible_text(), "");

        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert_eq!(engine.session().unwrap().visible_text(), "H");

        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert_eq!(engine.session().unwrap().visible_text(), "Hi");
    }

    #[test]
    fn tick_before_deadline_is_a_no_op() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hello"), 0, false, now);

        // Deadline not reached yet: nothing revealed, timer still armed.
        engine.tick(now);
        assert_eq!(engine.session().unwrap().revealed, 0);
        assert!(engine.next_deadline().is_some());
    }

    #[test]
    fn natural_completion_schedules_advance_and_requests_next() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hi"), 0, false, now);

        let requests = run_until_idle(&mut engine, now);
        assert_eq!(requests, vec![EngineRequest::NextQuote]);

        let session = engine.session().unwrap();
        assert!(session.is_complete);
        assert_eq!(session.visible_text(), "Hi");
        assert!(!engine.is_typing());
    }

    #[test]
    fn force_finish_matches_full_typing_at_any_index() {
        let text = "The quick brown fox jumps over the lazy dog.";
        let total = text.chars().count();

        for start in [0, 1, 10, total / 2, total - 1] {
            let mut engine = TypingEngine::new(false);
            let now = Instant::now();
            engine.display(quote(text), 0, false, now);

            // Type `start` characters, then cut to the end.
            for _ in 0..start {
                let due = engine.next_deadline().unwrap();
                engine.tick(due);
            }
            engine.force_finish();

            let session = engine.session().unwrap();
            assert_eq!(session.visible_text(), text, "start index {}", start);
            assert_eq!(session.revealed, total);
            assert!(session.is_paused);
            assert!(!engine.is_typing());
            assert!(engine.next_deadline().is_none());
        }
    }

    #[test]
    fn interact_while_typing_force_finishes_without_pause_toggle_semantics() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("A longer quote for typing."), 0, false, now);

        let req = engine.interact();
        assert_eq!(req, None);
        let session = engine.session().unwrap();
        assert_eq!(session.visible_text(), "A longer quote for typing.");
        assert!(session.is_paused);
    }

    #[test]
    fn interact_when_paused_requests_next_quote() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hi"), 0, false, now);
        engine.force_finish();
        assert!(engine.is_paused());

        let req = engine.interact();
        assert_eq!(req, Some(EngineRequest::NextQuote));
        assert!(!engine.is_paused());
        assert!(engine.next_deadline().is_none());
    }

    #[test]
    fn interact_when_complete_and_unpaused_pauses() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hi"), 0, false, now);

        // Type to natural completion but stop before the advance fires.
        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert!(engine.session().unwrap().is_complete);
        assert!(!engine.is_paused());

        // Space now parks the quote; the queued advance must not fire.
        let req = engine.interact();
        assert_eq!(req, None);
        assert!(engine.is_paused());

        let due = engine.next_deadline().unwrap();
        assert_eq!(engine.tick(due), None);
    }

    #[test]
    fn pause_then_resume_continues_from_exact_index() {
        let long_text = "abcdefghij".repeat(50); // 500 chars
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote(&long_text), 0, false, now);

        // Reveal three characters, then pause.
        for _ in 0..3 {
            let due = engine.next_deadline().unwrap();
            engine.tick(due);
        }
        engine.pause();
        assert!(engine.is_paused());
        assert!(!engine.is_typing());
        assert!(engine.next_deadline().is_none());
        assert_eq!(engine.session().unwrap().revealed, 3);

        // Resume: the next reveal continues at index 3, not 0.
        engine.resume(Instant::now());
        assert!(engine.is_typing());
        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert_eq!(engine.session().unwrap().revealed, 4);
        assert_eq!(engine.session().unwrap().visible_text(), "abcd");
    }

    #[test]
    fn at_most_one_pending_timer_across_transitions() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();

        engine.display(quote("First quote here"), 0, false, now);
        let first_deadline = engine.next_deadline().unwrap();

        // Starting a new session replaces the old timer instead of stacking.
        engine.display(quote("Second quote"), 0, false, now + Duration::from_millis(5));
        let second_deadline = engine.next_deadline().unwrap();
        assert_ne!(first_deadline, second_deadline);

        // Ticking past both deadlines reveals exactly one character: the
        // first session's timer is gone, so no double-speed reveal.
        engine.tick(second_deadline + Duration::from_millis(1));
        assert_eq!(engine.session().unwrap().revealed, 1);
        assert_eq!(engine.session().unwrap().quote.text, "Second quote");
    }

    #[test]
    fn display_while_paused_renders_instantly() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("First"), 0, false, now);
        engine.pause();

        // Paused engines don't animate new quotes.
        engine.display(quote("Second quote"), 0, false, now);
        let session = engine.session().unwrap();
        assert_eq!(session.visible_text(), "Second quote");
        assert!(session.is_complete);
    }

    #[test]
    fn reduced_motion_shows_quote_instantly() {
        let mut engine = TypingEngine::new(true);
        let now = Instant::now();
        engine.display(quote("No animation please"), 0, false, now);

        let session = engine.session().unwrap();
        assert_eq!(session.visible_text(), "No animation please");
        assert!(session.is_complete);
        assert!(!engine.is_typing());
    }

    #[test]
    fn display_from_start_index_resumes_midway() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("Hello world"), 6, false, now);

        assert_eq!(engine.session().unwrap().visible_text(), "Hello ");
        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert_eq!(engine.session().unwrap().visible_text(), "Hello w");
    }

    #[test]
    fn multibyte_text_reveals_on_char_boundaries() {
        let mut engine = TypingEngine::new(false);
        let now = Instant::now();
        engine.display(quote("héllo"), 0, false, now);

        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        let due = engine.next_deadline().unwrap();
        engine.tick(due);
        assert_eq!(engine.session().unwrap().visible_text(), "hé");
    }

    #[test]
    fn clear_drops_session_and_timer() {
        let mut engine = TypingEngine::new(false);
        engine.display(quote("Hi"), 0, false, Instant::now());
        engine.clear();
        assert!(engine.session().is_none());
        assert!(!engine.is_typing());
        assert!(engine.next_deadline().is_none());
    }
}
