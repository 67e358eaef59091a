//! Page metadata extraction
//!
//! Pulls title, description, favicon and preview image out of fetched
//! markup. The DOM pass is synchronous (`scraper`'s document tree is not
//! `Send`, so it never lives across an await point); asset references are
//! resolved afterwards through the async [`resolve`](crate::resolve) layer.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::codec::escape_value;
use crate::resolve::{resolve_asset, AssetProber};
use crate::types::LinkMetadata;

/// Metadata as read from the markup, before asset resolution.
/// Favicon and image hold the raw href/content values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    pub title: String,
    pub description: Option<String>,
    pub host: Option<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
}

/// Extract raw metadata from markup.
///
/// Returns `None` when no title is derivable; a title is the one hard
/// requirement gating construction of a record. Title and description are
/// normalized for block embedding: newlines stripped, backslashes and
/// quotes escaped, surrounding whitespace trimmed.
pub fn extract_metadata(url: &str, html: &str) -> Option<RawMetadata> {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#)
        .or_else(|| element_text(&document, "title"))
        .map(|t| normalize(&t))
        .filter(|t| !t.is_empty())?;

    let description = meta_content(&document, r#"meta[property="og:description"]"#)
        .or_else(|| meta_content(&document, r#"meta[name="description"]"#))
        .map(|d| normalize(&d))
        .filter(|d| !d.is_empty());

    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));

    let favicon = attr_value(&document, r#"link[rel~="icon"]"#, "href");
    let image = meta_content(&document, r#"meta[property="og:image"]"#);

    Some(RawMetadata {
        title,
        description,
        host,
        favicon,
        image,
    })
}

/// Extract a full record from markup, resolving favicon and image
/// references against the page's host.
///
/// `None` means no title was derivable. Fetch and markup failures are the
/// caller's concern; by the time markup reaches this function the only
/// expected absence is the title.
pub async fn extract(url: &str, html: &str, prober: &dyn AssetProber) -> Option<LinkMetadata> {
    let raw = extract_metadata(url, html)?;
    debug!(url, title = %raw.title, "extracted page metadata");

    let favicon = resolve_asset(raw.favicon.as_deref(), raw.host.as_deref(), prober).await;
    let image = resolve_asset(raw.image.as_deref(), raw.host.as_deref(), prober).await;

    Some(LinkMetadata {
        url: url.to_string(),
        title: raw.title,
        description: raw.description,
        host: raw.host,
        favicon: (!favicon.is_empty()).then_some(favicon),
        image: (!image.is_empty()).then_some(image),
        indent: 0,
    })
}

/// First matching element's `content` attribute
fn meta_content(document: &Html, selector: &str) -> Option<String> {
    attr_value(document, selector, "content")
}

/// First matching element's attribute value
fn attr_value(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// First matching element's text content
fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Strip newline variants, escape for quoted embedding, trim
fn normalize(text: &str) -> String {
    let flat = text.replace(['\n', '\r'], "");
    escape_value(flat.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OG_PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<meta property="og:title" content="Example Title">
<meta property="og:description" content="An example page">
<meta property="og:image" content="https://cdn.example.com/img.png">
<link rel="icon" href="/favicon.ico">
<title>Fallback Title</title>
</head><body></body></html>"#;

    #[test]
    fn test_extract_prefers_og_title() {
        let raw = extract_metadata("https://example.com", OG_PAGE).unwrap();
        assert_eq!(raw.title, "Example Title");
        assert_eq!(raw.description, Some("An example page".to_string()));
        assert_eq!(raw.host, Some("example.com".to_string()));
        assert_eq!(raw.favicon, Some("/favicon.ico".to_string()));
        assert_eq!(raw.image, Some("https://cdn.example.com/img.png".to_string()));
    }

    #[test]
    fn test_extract_falls_back_to_title_element() {
        let html = "<html><head><title>Plain Title</title></head></html>";
        let raw = extract_metadata("https://example.com", html).unwrap();
        assert_eq!(raw.title, "Plain Title");
        assert_eq!(raw.description, None);
    }

    #[test]
    fn test_extract_no_title_yields_none() {
        let html = "<html><head><meta name=\"description\" content=\"x\"></head></html>";
        assert!(extract_metadata("https://example.com", html).is_none());
    }

    #[test]
    fn test_extract_description_name_fallback() {
        let html = r#"<html><head>
<title>T</title>
<meta name="description" content="from name attr">
</head></html>"#;
        let raw = extract_metadata("https://example.com", html).unwrap();
        assert_eq!(raw.description, Some("from name attr".to_string()));
    }

    #[test]
    fn test_normalize_strips_newlines_and_escapes() {
        assert_eq!(normalize("  line1\nline2\r\n  "), "line1line2");
        assert_eq!(normalize(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(normalize(r"back\slash"), r"back\\slash");
    }

    #[test]
    fn test_normalize_escapes_backslash_before_quote() {
        // A backslash-quote pair must not be double-escaped into \\\\"
        assert_eq!(normalize(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn test_extract_handles_malformed_markup() {
        let html = "<html><head><title>Broken<title></head><body><p>unclosed";
        let raw = extract_metadata("https://example.com", html);
        assert!(raw.is_some());
    }
}
