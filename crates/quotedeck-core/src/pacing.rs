// Adaptive typing speed: short punchy quotes type fast, long rambling ones
// slow down so they stay readable mid-reveal.
use std::time::Duration;

/// Base per-character delay before any adjustment.
pub const BASE_DELAY_MS: u64 = 50;
/// Effective delay is clamped into this window.
pub const MIN_DELAY_MS: u64 = 20;
pub const MAX_DELAY_MS: u64 = 100;

/// Pause after a quote finishes before the next one is requested.
pub const POST_COMPLETION_DELAY: Duration = Duration::from_millis(3000);

const PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', '-', '(', ')', '"', '\''];

/// Per-quote speed multiplier from three signals: overall length, average
/// word length, and punctuation density.
fn speed_multiplier(text: &str) -> f64 {
    let char_count = text.chars().count();
    let words: Vec<&str> = text.split_whitespace().collect();

    // Length bucket: short quotes feel snappier typed fast, long ones need
    // breathing room.
    let mut multiplier: f64 = if char_count < 100 {
        0.8
    } else if char_count > 400 {
        1.4
    } else {
        1.0
    };

    if !words.is_empty() {
        let avg_word_len =
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64;
        if avg_word_len > 6.0 {
            multiplier *= 1.2;
        } else if avg_word_len < 4.0 {
            multiplier *= 0.9;
        }

        let punct_count = text.chars().filter(|c| PUNCTUATION.contains(c)).count();
        let density = punct_count as f64 / words.len() as f64;
        if density > 0.1 {
            multiplier *= 1.1;
        }
    }

    multiplier
}

/// Compute the per-character reveal delay for a quote.
///
/// Reduced motion wins over everything: a zero delay is treated by the
/// engine the same as an explicit finish-immediately request.
pub fn char_delay(text: &str, reduced_motion: bool) -> Duration {
    if reduced_motion {
        return Duration::ZERO;
    }

    let ms = (BASE_DELAY_MS as f64 * speed_multiplier(text)) as u64;
    Duration::from_millis(ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS))
}

/// Delay between natural completion and requesting the next quote.
pub fn advance_delay(reduced_motion: bool) -> Duration {
    if reduced_motion {
        Duration::ZERO
    } else {
        POST_COMPLETION_DELAY
    }
}
