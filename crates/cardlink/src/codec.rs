//! Card block codec
//!
//! Serializes a [`LinkMetadata`] record into the fenced ```` ```cardlink ````
//! block embedded in the document, and parses such a block back. The block
//! body is a YAML mapping; title and description values are double-quoted
//! and must therefore be escaped (see [`escape_value`]) by any producer.

use serde_yaml::{Mapping, Value};
use tracing::error;

use crate::error::CodecError;
use crate::types::{LinkMetadata, INDENT_UNSET};

/// Fence tag of the card block
pub const BLOCK_TAG: &str = "cardlink";

/// Escape a value for embedding in a double-quoted block scalar.
/// Backslashes first, then quotes, so an existing escape is not doubled.
pub fn escape_value(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Serialize a record into the canonical block form.
///
/// Deterministic: fixed field order (url, title, description, host,
/// favicon, image), absent fields omitted, title and description wrapped in
/// double quotes. The leading blank line and trailing newline are part of
/// the canonical format.
pub fn serialize(metadata: &LinkMetadata) -> String {
    let mut block = String::new();
    block.push_str("\n```");
    block.push_str(BLOCK_TAG);
    block.push('\n');
    block.push_str(&format!("url: {}\n", metadata.url));
    block.push_str(&format!("title: \"{}\"\n", metadata.title));
    if let Some(ref description) = metadata.description {
        block.push_str(&format!("description: \"{description}\"\n"));
    }
    if let Some(ref host) = metadata.host {
        block.push_str(&format!("host: {host}\n"));
    }
    if let Some(ref favicon) = metadata.favicon {
        block.push_str(&format!("favicon: {favicon}\n"));
    }
    if let Some(ref image) = metadata.image {
        block.push_str(&format!("image: {image}\n"));
    }
    block.push_str("```\n");
    block
}

/// Parse a card block back into a record.
///
/// Accepts the full fenced form or just the inner body. Leading tabs are
/// replaced with spaces before the YAML pass (YAML rejects tab
/// indentation); the tab count of the first indented line becomes the
/// record's `indent`, [`INDENT_UNSET`] when nothing was tab-indented.
pub fn parse(text: &str) -> Result<LinkMetadata, CodecError> {
    let (normalized, indent) = replace_leading_tabs(text);
    let body = strip_fences(&normalized);

    let mapping: Mapping = serde_yaml::from_str(&body).map_err(|err| {
        error!(%err, "card block is not a valid mapping");
        CodecError::YamlParse(err)
    })?;

    let url = string_field(&mapping, "url")?;
    let title = string_field(&mapping, "title")?;
    let (url, title) = match (url, title) {
        (Some(url), Some(title)) if !url.is_empty() && !title.is_empty() => (url, title),
        _ => return Err(CodecError::NoRequiredParams),
    };

    Ok(LinkMetadata {
        url,
        title,
        description: string_field(&mapping, "description")?,
        host: string_field(&mapping, "host")?,
        favicon: string_field(&mapping, "favicon")?,
        image: string_field(&mapping, "image")?,
        indent,
    })
}

/// Replace leading tabs with an equal number of spaces, line by line.
/// The first tab-indented line fixes the block's indent level.
fn replace_leading_tabs(text: &str) -> (String, i32) {
    let mut indent = INDENT_UNSET;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let tabs = line.chars().take_while(|&c| c == '\t').count();
            if tabs == 0 {
                return line.to_string();
            }
            if indent == INDENT_UNSET {
                indent = tabs as i32;
            }
            format!("{}{}", " ".repeat(tabs), &line[tabs..])
        })
        .collect();
    (lines.join("\n"), indent)
}

/// Drop the fence lines, keeping the mapping body
fn strip_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn string_field(mapping: &Mapping, key: &str) -> Result<Option<String>, CodecError> {
    match mapping.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CodecError::UnquotedValue {
            key: key.to_string(),
        }),
    }
}
