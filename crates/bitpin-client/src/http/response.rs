/*
[INPUT]:  Raw transport responses (method, url, status, body text)
[OUTPUT]: Decoded JSON results or APIError/RequestError
[POS]:    HTTP layer - response normalization shared by both client flavours
[UPDATE]: When changing success/error discrimination or verb-specific quirks
*/

use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::debug;

use crate::http::{BitpinError, Result};
use crate::types::RequestMethod;

/// Status and body of one HTTP exchange; `url` is the request URI, not the post-redirect one
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub method: RequestMethod,
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

/// Classify a raw response and decode it.
///
/// - non-2xx: `BitpinError::Api`, for every verb
/// - 2xx DELETE: `{"status": "success", "id": <second-to-last path segment>}`
/// - other 2xx: the JSON body, or `BitpinError::Request` when it does not parse
pub fn normalize(response: RawResponse) -> Result<Value> {
    debug!(
        method = %response.method,
        url = %response.url,
        status = response.status.as_u16(),
        "normalizing response"
    );

    if !response.status.is_success() {
        return Err(BitpinError::from_response_body(
            response.status,
            &response.body,
            Some(response.url),
        ));
    }

    if response.method == RequestMethod::Delete {
        return Ok(json!({
            "status": "success",
            "id": deleted_id(&response.url),
        }));
    }

    serde_json::from_str(&response.body)
        .map_err(|_| BitpinError::Request(format!("Invalid Response: {}", response.body)))
}

/// Second-to-last `/`-separated segment of the URL path
fn deleted_id(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segments: Vec<&str> = path.split('/').collect();
    segments
        .len()
        .checked_sub(2)
        .and_then(|idx| segments.get(idx))
        .map(|segment| segment.to_string())
        .unwrap_or_default()
}

/// Narrow a paginated response to the first result whose `key` equals `value`.
pub fn pick(mut response: Value, key: &str, value: &Value) -> Result<Value> {
    let found = response
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.iter().find(|item| item.get(key) == Some(value)))
        .cloned();

    match found {
        Some(item) => {
            response["results"] = item;
            Ok(response)
        }
        None => Err(BitpinError::Config(format!(
            "{key} {value} not found in {response}"
        ))),
    }
}
