//! Error types for cardlink

use thiserror::Error;

/// Errors that can occur while fetching a remote page.
///
/// The orchestrator treats every variant the same way (no metadata, revert
/// the document); the distinctions exist for logging and for CLI output.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out waiting for a response
    #[error("Request timed out: server did not respond in time")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Server answered with a non-200 status
    #[error("Server returned status {0}")]
    Status(u16),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors raised when parsing an embedded card block.
///
/// These surface at the render boundary as inline error cards; parse detail
/// beyond the message goes to the diagnostic log.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Block body is not a well-formed key-value mapping
    #[error("Card block is not valid YAML: check the log for details")]
    YamlParse(#[source] serde_yaml::Error),

    /// Mapping parsed, but a required key is missing or empty
    #[error("Required parameters are missing: [url, title]")]
    NoRequiredParams,

    /// A value parsed as something other than a string scalar,
    /// typically an unquoted internal link
    #[error("Value for `{key}` must be a quoted string: wrap internal links in double quotes")]
    UnquotedValue { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::MissingUrl.to_string(),
            "Missing required parameter: url"
        );
        assert_eq!(
            FetchError::InvalidUrlScheme.to_string(),
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(
            FetchError::Status(404).to_string(),
            "Server returned status 404"
        );
    }

    #[test]
    fn test_codec_error_messages() {
        assert_eq!(
            CodecError::NoRequiredParams.to_string(),
            "Required parameters are missing: [url, title]"
        );
        assert_eq!(
            CodecError::UnquotedValue {
                key: "url".to_string()
            }
            .to_string(),
            "Value for `url` must be a quoted string: wrap internal links in double quotes"
        );
    }
}
