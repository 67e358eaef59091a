//! Page fetching
//!
//! One GET per enhanced link. Any non-200 status or transport failure maps
//! to a [`FetchError`]; the orchestrator folds all of them into "no
//! metadata". The body is read as a stream against a total deadline so a
//! slow server yields a partial page rather than a hung task.

use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{error, warn};

use crate::error::FetchError;
use crate::DEFAULT_USER_AGENT;

/// First-byte timeout (connect + first response byte)
const FIRST_BYTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Body timeout (total)
const BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch configuration threaded in from the caller
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
}

/// Fetch a page and return its markup.
///
/// A truncated body (total deadline hit mid-stream) is returned as-is;
/// metadata extraction is best-effort and the interesting tags sit in the
/// document head.
pub async fn fetch_page(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrlScheme);
    }

    let mut headers = HeaderMap::new();
    let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
    );

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(FIRST_BYTE_TIMEOUT)
        .timeout(FIRST_BYTE_TIMEOUT)
        .build()
        .map_err(FetchError::ClientBuildError)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(FetchError::from_reqwest)?;

    let status = response.status();
    if status.as_u16() != 200 {
        return Err(FetchError::Status(status.as_u16()));
    }

    let (body, truncated) = read_body_with_timeout(response, BODY_TIMEOUT).await;
    if truncated {
        warn!(url, "body deadline reached, using partial page");
    }

    Ok(String::from_utf8_lossy(&body).to_string())
}

/// Read response body with timeout, returning partial content if timeout occurs
async fn read_body_with_timeout(response: reqwest::Response, timeout: Duration) -> (Bytes, bool) {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        error!("Error reading body chunk: {}", e);
                        let has_content = !body.is_empty();
                        return (Bytes::from(body), has_content);
                    }
                    None => {
                        // Stream complete
                        return (Bytes::from(body), false);
                    }
                }
            }
            _ = timeout_future => {
                return (Bytes::from(body), true);
            }
        }
    }
}
