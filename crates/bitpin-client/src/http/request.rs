/*
[INPUT]:  Verb, absolute URI, signed flag, caller options, default options, current token
[OUTPUT]: RequestEnvelope with timeout, headers, query string and body
[POS]:    HTTP layer - pure request assembly, no network access
[UPDATE]: When changing option merge rules or auth header injection
*/

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;
use url::form_urlencoded;

use crate::types::RequestMethod;

/// Body key holding per-call overrides of transport options
pub const REQUESTS_PARAMS_KEY: &str = "requests_params";

pub const AUTHORIZATION: &str = "Authorization";

/// Caller-supplied transport options; also the type of the configured defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Map<String, Value>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    /// Merge `self` over `defaults`; on every key collision `self` wins
    pub fn merged_over(self, defaults: &RequestOptions) -> RequestOptions {
        let mut headers = defaults.headers.clone();
        headers.extend(self.headers);

        let body = match (defaults.body.clone(), self.body) {
            (Some(mut base), Some(own)) => {
                base.extend(own);
                Some(base)
            }
            (base, own) => own.or(base),
        };

        RequestOptions {
            timeout: self.timeout.or(defaults.timeout),
            headers,
            body,
        }
    }
}

/// Fully assembled transport parameters for one call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub method: RequestMethod,
    pub uri: String,
    pub signed: bool,
    pub timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub query: Option<String>,
    pub body: Option<Map<String, Value>>,
}

impl RequestEnvelope {
    /// URI with the flattened query appended
    pub fn url(&self) -> String {
        match &self.query {
            Some(query) if !query.is_empty() => {
                let separator = if self.uri.contains('?') { '&' } else { '?' };
                format!("{}{}{}", self.uri, separator, query)
            }
            _ => self.uri.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Assemble the envelope for one call.
///
/// `access_token` is read by the caller at build time, so a concurrent refresh
/// is picked up by the next call.
pub fn build_envelope(
    method: RequestMethod,
    uri: String,
    signed: bool,
    access_token: Option<&str>,
    default_timeout: Duration,
    defaults: &RequestOptions,
    options: RequestOptions,
) -> RequestEnvelope {
    let merged = options.merged_over(defaults);
    let mut timeout = merged.timeout.unwrap_or(default_timeout);
    let mut headers = merged.headers;
    let mut body = merged.body;

    if let Some(map) = body.as_mut() {
        if let Some(overrides) = map.remove(REQUESTS_PARAMS_KEY) {
            apply_overrides(&overrides, &mut timeout, &mut headers);
        }
    }

    if signed {
        if access_token.is_none() {
            debug!(%uri, "signed call without an access token");
        }
        headers.insert(
            AUTHORIZATION.to_string(),
            format!("Bearer {}", access_token.unwrap_or_default()),
        );
    }

    let mut query = None;
    if method == RequestMethod::Get {
        if let Some(map) = body.take() {
            if !map.is_empty() {
                query = Some(flatten_query(&map));
            }
        }
    }

    RequestEnvelope {
        method,
        uri,
        signed,
        timeout,
        headers,
        query,
        body,
    }
}

/// Percent-encoded `key=value` pairs joined by `&`, in map order
pub fn flatten_query(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            format!("{}={}", encode(key), encode(&value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn apply_overrides(
    overrides: &Value,
    timeout: &mut Duration,
    headers: &mut BTreeMap<String, String>,
) {
    let Some(overrides) = overrides.as_object() else {
        debug!("ignoring non-object requests_params override");
        return;
    };

    for (key, value) in overrides {
        match (key.as_str(), value) {
            ("timeout", Value::Number(secs)) => {
                match secs.as_f64().map(Duration::try_from_secs_f64) {
                    Some(Ok(parsed)) => *timeout = parsed,
                    _ => debug!(%secs, "ignoring invalid timeout override"),
                }
            }
            ("headers", Value::Object(extra)) => {
                for (name, value) in extra {
                    let value = match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    headers.insert(name.clone(), value);
                }
            }
            (other, _) => debug!(key = other, "ignoring unsupported requests_params override"),
        }
    }
}
