//! Turns a marked-up menu fragment into text that can be spoken.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static FOOTNOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<sup\b[^>]*>.*?</sup\s*>").expect("valid footnote regex"));

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*\bclass\s*=\s*["'][^"']*\bseperator\b[^"']*["'][^>]*>.*?</span\s*>"#)
        .expect("valid separator regex")
});

static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip footnotes, spell out the "or" separator, drop tags, `+` markers and
/// entities. Never fails; garbage in yields a best-effort string.
pub fn normalize(fragment: &str) -> String {
    let without_footnotes = FOOTNOTE_RE.replace_all(fragment, "");

    // An unclosed footnote swallows the rest of the fragment.
    let truncated = match without_footnotes.to_ascii_lowercase().find("<sup") {
        Some(idx) => &without_footnotes[..idx],
        None => &without_footnotes[..],
    };

    let with_separators = SEPARATOR_RE.replace_all(truncated, " oder ");

    let text: String = Html::parse_fragment(&with_separators)
        .root_element()
        .text()
        .collect();

    let decoded = decode_entities(&text).replace('+', "");

    WS_RE.replace_all(&decoded, " ").trim().to_string()
}

/// The source sometimes escapes more than once, so decode until nothing
/// changes. A pass that changes the text consumes at least one `;`.
fn decode_entities(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = html_escape::decode_html_entities(&current).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
