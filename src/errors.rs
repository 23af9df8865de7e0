use std::error::Error as StdError;
use thiserror::Error;

/// Result type alias for Datadog API operations
pub type Result<T> = std::result::Result<T, DatadogError>;

/// Errors that can occur when talking to the Datadog API
#[derive(Debug, Error)]
pub enum DatadogError {
    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// HTTP request failed (connection, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// Failed to serialize a request body
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Response body could not be read or was not valid JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The configured host, version and path do not form a valid URL
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// Datadog API returned an error response
    #[error("Datadog API error: HTTP {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from Datadog
        message: String,
    },

    /// A CLI subcommand was unknown or missing arguments
    #[error("{0}")]
    Usage(String),
}

impl DatadogError {
    pub(crate) fn usage(resource: &str) -> Self {
        Self::Usage(format!(
            "unknown subcommand or arguments try `dogapi {resource} --help` for help"
        ))
    }

    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    ///
    /// The client never retries on its own; this is for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let reqwest_middleware::Error::Reqwest(err) = source {
                    return err.is_connect() || err.is_timeout();
                }
                if let Some(inner) = StdError::source(source) {
                    if let Some(err) = inner.downcast_ref::<reqwest::Error>() {
                        return err.is_connect() || err.is_timeout();
                    }
                }
                false
            }
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the request hit the transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(reqwest_middleware::Error::Reqwest(err)) if err.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_retryable_5xx() {
        for status in [500, 502, 503] {
            let error = DatadogError::Api {
                status,
                message: "server error".to_string(),
            };
            assert!(error.is_retryable());
        }
    }

    #[test]
    fn test_api_error_not_retryable_4xx() {
        for status in [400, 403, 404] {
            let error = DatadogError::Api {
                status,
                message: "client error".to_string(),
            };
            assert!(!error.is_retryable());
        }
    }

    #[test]
    fn test_error_display() {
        let error = DatadogError::Api {
            status: 403,
            message: "{\"errors\": [\"Forbidden\"]}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Datadog API error: HTTP 403 - {\"errors\": [\"Forbidden\"]}"
        );
    }

    #[test]
    fn test_usage_error_message() {
        let error = DatadogError::usage("monitor");
        assert_eq!(
            error.to_string(),
            "unknown subcommand or arguments try `dogapi monitor --help` for help"
        );
        assert!(!error.is_retryable());
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_serialize_error_not_retryable() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let error = DatadogError::Serialize(json_err);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_decode_error_not_retryable() {
        let error = DatadogError::Decode("expected value at line 1 column 1".to_string());
        assert!(!error.is_retryable());
    }
}
