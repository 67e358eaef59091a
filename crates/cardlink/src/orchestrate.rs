//! Placeholder-replace orchestration
//!
//! Drives the fetch-then-replace workflow against an editable document:
//! insert a tokenized placeholder over the selection, fetch and extract
//! metadata, find the placeholder again by exact substring search, then
//! swap in the serialized card block or revert to the original text.
//!
//! Everything here is best-effort. If the document was edited concurrently
//! and the placeholder is gone, the task exits without effect; no error
//! leaves this module uncaught.

use rand::Rng;
use tracing::{debug, warn};

use crate::classify::{is_image, is_url};
use crate::codec;
use crate::document::{offset_to_position, EditableDocument};
use crate::extract::extract;
use crate::fetch::{fetch_page, FetchOptions};
use crate::resolve::AssetProber;
use crate::types::{LinkMetadata, Settings};

/// Transient user-facing notices (toast, status bar, ...)
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Default notifier: routes notices to the log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{message}");
    }
}

/// Configured enhance workflow.
///
/// Settings and network availability are explicit call-time state, not
/// ambient globals; a host constructs one of these per invocation context.
#[derive(Debug, Clone)]
pub struct CardEnhancer {
    settings: Settings,
    network_available: bool,
    options: FetchOptions,
}

impl CardEnhancer {
    /// Create an enhancer with default fetch options
    pub fn new(settings: Settings, network_available: bool) -> Self {
        Self {
            settings,
            network_available,
            options: FetchOptions::default(),
        }
    }

    /// Override fetch options
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a default paste of `text` should go through enhancement.
    ///
    /// Image URLs classify as URLs too, but stay a plain paste; card
    /// conversion is for pages.
    pub fn should_enhance_paste(&self, text: &str) -> bool {
        self.settings.enhance_default_paste
            && self.network_available
            && is_url(text)
            && !is_image(text)
    }

    /// Run the full placeholder-replace protocol for `url`.
    ///
    /// On success the selection (or insertion point) ends up holding the
    /// serialized card block. On any failure the original selected text,
    /// or the bare URL when nothing was selected, is restored and a notice
    /// is emitted.
    pub async fn enhance(
        &self,
        doc: &mut dyn EditableDocument,
        url: &str,
        prober: &dyn AssetProber,
        notifier: &dyn Notifier,
    ) {
        if !self.network_available {
            notifier.notify("You are offline: link card was not created");
            return;
        }

        let selected = doc.selection();
        let placeholder = format!("[Fetching Data#{}]({url})", placeholder_token());
        doc.replace_selection(&placeholder);

        let metadata = self.fetch_metadata(url, prober).await;

        // Re-read: the document may have changed while we were fetching.
        let text = doc.text();
        let Some(start) = text.find(&placeholder) else {
            debug!(url, "placeholder no longer present, skipping replacement");
            return;
        };
        let end = start + placeholder.len();
        let from = offset_to_position(&text, start);
        let to = offset_to_position(&text, end);

        match metadata {
            Some(metadata) => {
                doc.replace_range(from, to, &codec::serialize(&metadata));
            }
            None => {
                notifier.notify("Couldn't fetch link metadata: restored the original text");
                let fallback = if selected.is_empty() {
                    url.to_string()
                } else {
                    selected
                };
                doc.replace_range(from, to, &fallback);
            }
        }
    }

    /// Fetch and extract, folding every failure into `None`
    async fn fetch_metadata(&self, url: &str, prober: &dyn AssetProber) -> Option<LinkMetadata> {
        let html = match fetch_page(url, &self.options).await {
            Ok(html) => html,
            Err(err) => {
                warn!(%err, url, "page fetch failed");
                return None;
            }
        };
        extract(url, &html, prober).await
    }
}

/// Short random token disambiguating concurrent placeholders.
/// Not a security token.
fn placeholder_token() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..4)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_placeholder_token_shape() {
        for _ in 0..32 {
            let token = placeholder_token();
            assert_eq!(token.len(), 4);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_should_enhance_paste() {
        let settings = Settings {
            enhance_default_paste: true,
            show_in_menu_item: true,
        };
        let enhancer = CardEnhancer::new(settings, true);

        assert!(enhancer.should_enhance_paste("https://example.com"));
        // image URLs stay a plain paste
        assert!(!enhancer.should_enhance_paste("https://example.com/a.png"));
        assert!(!enhancer.should_enhance_paste("not a url"));

        let offline = CardEnhancer::new(settings, false);
        assert!(!offline.should_enhance_paste("https://example.com"));

        let disabled = CardEnhancer::new(Settings::default(), true);
        assert!(!disabled.should_enhance_paste("https://example.com"));
    }

    #[tokio::test]
    async fn test_enhance_offline_leaves_document_untouched() {
        use crate::document::TextBuffer;
        use crate::resolve::AssetProber;
        use async_trait::async_trait;

        struct NoProbe;
        #[async_trait]
        impl AssetProber for NoProbe {
            async fn is_reachable(&self, _url: &str) -> bool {
                false
            }
        }

        let mut doc = TextBuffer::new("before https://example.com after");
        let notifier = RecordingNotifier::new();
        let enhancer = CardEnhancer::new(Settings::default(), false);
        enhancer
            .enhance(&mut doc, "https://example.com", &NoProbe, &notifier)
            .await;

        assert_eq!(doc.text(), "before https://example.com after");
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);
    }
}
