// Share payload formatting
use std::sync::OnceLock;

use regex::Regex;

use crate::models::Quote;

fn markdown_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // [label](url) -> label. Quote sources occasionally embed attribution
    // links in the text; nobody wants raw markdown on their clipboard.
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"))
}

/// Strip markdown-style `[label](url)` links down to the plain label.
pub fn strip_markdown_links(text: &str) -> String {
    markdown_link_re().replace_all(text, "$1").into_owned()
}

/// The canonical share string: `"<quote>" — <author>`, links stripped.
pub fn share_text(quote: &Quote) -> String {
    format!(
        "\"{}\" — {}",
        strip_markdown_links(&quote.text),
        strip_markdown_links(&quote.author)
    )
}
