//! Asset URL resolution
//!
//! Favicon and preview-image references come out of markup in three shapes:
//! protocol-relative (`//host/path`), root-relative (`/path`), or already
//! absolute. The first two need a scheme (and possibly a host) filled in,
//! chosen by probing which candidate origin actually serves the asset.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;

/// Probe timeout per candidate
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reachability probe for asset URLs.
///
/// Production code uses [`HttpProber`]; tests substitute a stub that
/// scripts which candidates answer.
#[async_trait]
pub trait AssetProber: Send + Sync {
    /// True if the URL serves a loadable resource
    async fn is_reachable(&self, url: &str) -> bool;
}

/// reqwest-backed prober: a GET that completes with a success status
/// counts as reachable.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with default timeouts
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(PROBE_TIMEOUT)
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetProber for HttpProber {
    async fn is_reachable(&self, url: &str) -> bool {
        match self
            .client
            .get(url)
            .header(ACCEPT, "image/*, */*;q=0.8")
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(%err, url, "asset probe failed");
                false
            }
        }
    }
}

/// Resolve an asset reference to an absolute URL.
///
/// - absent reference: empty string
/// - protocol-relative: probe the `https:` form, then the `http:` form,
///   sequentially with short-circuit; the `https:` form stays the answer
///   unless only the `http:` probe succeeds
/// - root-relative with a known host: build both scheme candidates, await
///   both probes, prefer https, else http, else hand back the reference
///   unchanged
/// - anything else: returned unchanged, no probing
pub async fn resolve_asset(
    reference: Option<&str>,
    host: Option<&str>,
    prober: &dyn AssetProber,
) -> String {
    let Some(reference) = reference else {
        return String::new();
    };

    if reference.starts_with("//") {
        let https = format!("https:{reference}");
        if prober.is_reachable(&https).await {
            return https;
        }
        let http = format!("http:{reference}");
        if prober.is_reachable(&http).await {
            return http;
        }
        return https;
    }

    if reference.starts_with('/') {
        if let Some(host) = host {
            let https = format!("https://{host}{reference}");
            let http = format!("http://{host}{reference}");
            let (https_ok, http_ok) = tokio::join!(
                prober.is_reachable(&https),
                prober.is_reachable(&http)
            );
            if https_ok {
                return https;
            }
            if http_ok {
                return http;
            }
        }
        return reference.to_string();
    }

    reference.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted prober: reachable iff the URL starts with one of the
    /// configured prefixes; records probe order.
    struct StubProber {
        reachable_prefixes: Vec<&'static str>,
        probed: Mutex<Vec<String>>,
    }

    impl StubProber {
        fn new(reachable_prefixes: Vec<&'static str>) -> Self {
            Self {
                reachable_prefixes,
                probed: Mutex::new(Vec::new()),
            }
        }

        fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetProber for StubProber {
        async fn is_reachable(&self, url: &str) -> bool {
            self.probed.lock().unwrap().push(url.to_string());
            self.reachable_prefixes.iter().any(|p| url.starts_with(p))
        }
    }

    #[tokio::test]
    async fn test_absent_reference_is_empty() {
        let prober = StubProber::new(vec![]);
        assert_eq!(resolve_asset(None, Some("example.com"), &prober).await, "");
        assert!(prober.probed().is_empty());
    }

    #[tokio::test]
    async fn test_protocol_relative_prefers_https() {
        let prober = StubProber::new(vec!["https://"]);
        let resolved =
            resolve_asset(Some("//cdn.example.com/i.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "https://cdn.example.com/i.png");
        // http probe short-circuited away
        assert_eq!(prober.probed().len(), 1);
    }

    #[tokio::test]
    async fn test_protocol_relative_falls_back_to_http() {
        let prober = StubProber::new(vec!["http://"]);
        let resolved =
            resolve_asset(Some("//cdn.example.com/i.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "http://cdn.example.com/i.png");
        assert_eq!(prober.probed().len(), 2);
    }

    #[tokio::test]
    async fn test_protocol_relative_neither_reachable_stays_https() {
        let prober = StubProber::new(vec![]);
        let resolved =
            resolve_asset(Some("//cdn.example.com/i.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "https://cdn.example.com/i.png");
    }

    #[tokio::test]
    async fn test_root_relative_prefers_https() {
        let prober = StubProber::new(vec!["https://", "http://"]);
        let resolved = resolve_asset(Some("/img.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "https://example.com/img.png");
        // both candidates probed before deciding
        assert_eq!(prober.probed().len(), 2);
    }

    #[tokio::test]
    async fn test_root_relative_http_only() {
        let prober = StubProber::new(vec!["http://"]);
        let resolved = resolve_asset(Some("/img.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "http://example.com/img.png");
    }

    #[tokio::test]
    async fn test_root_relative_neither_reachable_unchanged() {
        let prober = StubProber::new(vec![]);
        let resolved = resolve_asset(Some("/img.png"), Some("example.com"), &prober).await;
        assert_eq!(resolved, "/img.png");
    }

    #[tokio::test]
    async fn test_root_relative_without_host_unchanged() {
        let prober = StubProber::new(vec!["https://", "http://"]);
        let resolved = resolve_asset(Some("/img.png"), None, &prober).await;
        assert_eq!(resolved, "/img.png");
        assert!(prober.probed().is_empty());
    }

    #[tokio::test]
    async fn test_absolute_reference_unchanged() {
        let prober = StubProber::new(vec![]);
        let resolved = resolve_asset(
            Some("https://cdn.example.com/i.png"),
            Some("example.com"),
            &prober,
        )
        .await;
        assert_eq!(resolved, "https://cdn.example.com/i.png");
        assert!(prober.probed().is_empty());
    }
}
