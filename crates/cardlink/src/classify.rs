//! URL classification
//!
//! Stateless predicates over raw text: whole-string URL and Markdown-link
//! matching for paste handling, plus a non-anchored scanner for finding
//! URLs embedded in a line at arbitrary offsets.

use regex::Regex;
use std::sync::LazyLock;

/// Absolute-URL grammar, unanchored.
///
/// Scheme plus optional `www.`, or a bare `www.` host. Domain labels come in
/// two alternative shapes joined with `|`: hyphen-tolerant labels of at
/// least 3 characters, or simple alphanumeric labels of at least 1. The
/// final `\S{2,}` requires at least 2 trailing non-whitespace characters
/// after the last label separator.
const URL_GRAMMAR: &str =
    r"(?:https?://(?:www\.)?|www\.)(?:(?:[a-zA-Z0-9][a-zA-Z0-9-]{1,}[a-zA-Z0-9])|[a-zA-Z0-9]+)(?:\.(?:(?:[a-zA-Z0-9][a-zA-Z0-9-]{1,}[a-zA-Z0-9])|[a-zA-Z0-9]+))*\.\S{2,}";

/// Markdown link grammar, unanchored: `[label](url)` with a label that
/// excludes literal brackets.
static LINK_GRAMMAR: LazyLock<String> =
    LazyLock::new(|| format!(r"\[[^\[\]]*\]\({URL_GRAMMAR}\)"));

static URL_ANCHORED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i)^{URL_GRAMMAR}$")).expect("url grammar compiles"));

static LINK_ANCHORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)^{}$", &*LINK_GRAMMAR)).expect("link grammar compiles")
});

static SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)(?:{}|{URL_GRAMMAR})", &*LINK_GRAMMAR)).expect("scan grammar compiles")
});

/// Image file extensions recognized by [`is_image`]
const IMAGE_EXTENSIONS: &[&str] = &[
    "gif", "jpg", "jpeg", "tif", "tiff", "png", "webp", "bmp", "tga", "psd", "ai",
];

/// True iff the entire string is an absolute URL.
///
/// URLs embedded in longer text do not qualify; use [`find_urls`] for those.
pub fn is_url(text: &str) -> bool {
    URL_ANCHORED.is_match(text)
}

/// True iff the string ends with a known image file extension
/// (case-insensitive).
pub fn is_image(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    match lower.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext),
        None => false,
    }
}

/// True iff the entire string is a Markdown link `[label](url)` whose url
/// satisfies the same grammar as [`is_url`].
pub fn is_linked_url(text: &str) -> bool {
    LINK_ANCHORED.is_match(text)
}

/// One URL or Markdown link found inside a longer string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch<'a> {
    /// The matched text
    pub text: &'a str,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
}

/// Scan a string for embedded URLs and Markdown links.
///
/// Non-anchored counterpart of the predicates above: yields zero or more
/// matches in order, each call returning a fresh iterator.
pub fn find_urls(text: &str) -> impl Iterator<Item = UrlMatch<'_>> {
    SCAN.find_iter(text).map(|m| UrlMatch {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}
