//! Destination filename construction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest stem kept before the extension is appended
const MAX_STEM_CHARS: usize = 254;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anything that is not a letter, number, underscore, hyphen, dot or whitespace.
/// Combining marks are not word characters here, so decomposed accents drop.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^-\p{L}\p{N}_.\s]").unwrap());

/// Build `"{title} - {author}.{extension}"` with unsafe characters removed.
///
/// Whitespace runs collapse to one space, the stem is cut to 254 characters
/// and the extension is appended unchanged.
pub fn sanitize(title: &str, author: &str, extension: &str) -> String {
    let mut name = clean_stem(&format!("{} - {}", title, author));

    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }

    name
}

fn clean_stem(stem: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(stem, " ");
    let cleaned = DISALLOWED.replace_all(collapsed.trim(), "");
    cleaned.chars().take(MAX_STEM_CHARS).collect()
}

/// Drop words listed in `stopwords` (case-insensitive) from a title
pub fn strip_stopwords(title: &str, stopwords: &[String]) -> String {
    title
        .split_whitespace()
        .filter(|word| {
            let lower = word.to_lowercase();
            !stopwords.iter().any(|s| s.to_lowercase() == lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
