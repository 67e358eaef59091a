//! Core types for cardlink

use serde::{Deserialize, Serialize};

/// Sentinel `indent` value for a parsed block that carried no tab indentation.
///
/// Consumers treat this the same as `0` (not nested); the value is preserved
/// verbatim so a re-serializing caller can tell the two apart.
pub const INDENT_UNSET: i32 = -1;

/// Metadata describing one link, as extracted from a remote page or parsed
/// back from an embedded card block.
///
/// `url` and `title` are required; a page with no derivable title yields no
/// record at all. `title` and `description` hold block-safe text: newlines
/// stripped, backslashes and double quotes escaped (see
/// [`escape_value`](crate::codec::escape_value)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    /// Canonical source URL (required, non-empty)
    pub url: String,

    /// Page title (required)
    pub title: String,

    /// Page description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hostname portion of `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Favicon reference, absolute or host-relative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    /// Preview image reference, absolute or host-relative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Nesting depth captured when parsing a tab-indented block.
    /// `0` for freshly extracted records, [`INDENT_UNSET`] when a parsed
    /// block had no tab indentation.
    #[serde(default)]
    pub indent: i32,
}

impl LinkMetadata {
    /// Create a record with the required fields, optional fields absent
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: None,
            host: None,
            favicon: None,
            image: None,
            indent: 0,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the favicon reference
    pub fn favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }

    /// Set the preview image reference
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// User-facing feature toggles, threaded into the orchestrator at call time
/// rather than read from ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Convert pasted URLs to cards without an explicit command
    pub enhance_default_paste: bool,

    /// Offer the enhance action in the editor menu
    pub show_in_menu_item: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enhance_default_paste: false,
            show_in_menu_item: true,
        }
    }
}
