//! Cardlink - link-preview card pipeline for text editors
//!
//! This crate turns plain URLs into rich "card" previews: it fetches the
//! page, extracts metadata (title, description, host, favicon, preview
//! image), and serializes the result into a fenced ```` ```cardlink ````
//! block that an editor embeds in the document and can parse back.
//!
//! ## Pipeline
//!
//! raw text → [`classify`] → [`fetch_page`] → [`extract`] (resolving asset
//! references through [`resolve_asset`]) → [`LinkMetadata`] →
//! [`codec::serialize`]. The inverse direction is [`codec::parse`] on block
//! text stored in a document.
//!
//! [`CardEnhancer`] ties the pipeline to a live [`EditableDocument`] with
//! the placeholder-insert/fetch/replace protocol.

pub mod classify;
pub mod codec;
pub mod document;
mod error;
mod extract;
mod fetch;
mod orchestrate;
pub mod resolve;
mod types;

pub use classify::{find_urls, is_image, is_linked_url, is_url, UrlMatch};
pub use document::{offset_to_position, EditableDocument, Position, TextBuffer};
pub use error::{CodecError, FetchError};
pub use extract::{extract, extract_metadata, RawMetadata};
pub use fetch::{fetch_page, FetchOptions};
pub use orchestrate::{CardEnhancer, LogNotifier, Notifier};
pub use resolve::{resolve_asset, AssetProber, HttpProber};
pub use types::{LinkMetadata, Settings, INDENT_UNSET};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Cardlink/1.0";
