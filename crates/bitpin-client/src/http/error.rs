/*
[INPUT]:  Error sources (transport, remote API status, JSON decoding, config)
[OUTPUT]: Structured error types carrying status code, detail and request URL
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing API error extraction
*/

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::types::ParseEnumError;

/// Main error type for the Bitpin client
#[derive(Error, Debug)]
pub enum BitpinError {
    /// The remote service answered with a non-2xx status
    #[error(
        "APIError(code={status_code}): {message} | {} | {}",
        display_result(.result),
        display_url(.url)
    )]
    Api {
        status_code: u16,
        message: String,
        result: Option<Value>,
        url: Option<String>,
    },

    /// A 2xx response whose body is not valid JSON
    #[error("RequestException: {0}")]
    Request(String),

    /// HTTP transport failed (DNS, connection reset, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport gave up waiting for the response
    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// A call was issued after `close_connection`
    #[error("Connection already closed")]
    ConnectionClosed,

    /// A JSON body did not match the expected response model
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid enum value supplied by the caller
    #[error(transparent)]
    InvalidEnum(#[from] ParseEnumError),

    /// Configuration or lookup error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn display_result(result: &Option<Value>) -> String {
    result
        .as_ref()
        .map_or_else(|| "None".to_string(), Value::to_string)
}

fn display_url(url: &Option<String>) -> &str {
    url.as_deref().unwrap_or("None")
}

impl BitpinError {
    /// Build an API error from a failed response body.
    ///
    /// `detail` becomes the message and `result` is kept as payload; a body that
    /// is not JSON is carried verbatim inside a fallback message.
    pub fn from_response_body(status: StatusCode, body: &str, url: Option<String>) -> Self {
        let (message, result) = match serde_json::from_str::<Value>(body) {
            Ok(json) => {
                let message = match json.get("detail") {
                    Some(Value::String(detail)) => detail.clone(),
                    Some(other) => other.to_string(),
                    None => "Unknown error".to_string(),
                };
                (message, json.get("result").cloned())
            }
            Err(_) => (
                format!("Invalid JSON error message from Bitpin: {body}"),
                None,
            ),
        };

        BitpinError::Api {
            status_code: status.as_u16(),
            message,
            result,
            url,
        }
    }

    /// HTTP status of an API error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BitpinError::Api { status_code, .. } => Some(*status_code),
            BitpinError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Check if error indicates an authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }

    /// Check if the transport timed out
    pub fn is_timeout(&self) -> bool {
        match self {
            BitpinError::Timeout { .. } => true,
            BitpinError::Http(err) => err.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias for Bitpin operations
pub type Result<T> = std::result::Result<T, BitpinError>;
