/*
[INPUT]:  RequestEnvelope and connection settings (connect timeout, default headers)
[OUTPUT]: RawResponse from one HTTP exchange, or a transport error
[POS]:    HTTP layer - blocking and non-blocking transport adapters
[UPDATE]: When adding transport backends or changing session lifetime
*/

use std::fmt::Debug;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::http::{BitpinError, RawResponse, RequestEnvelope, Result};

/// Non-blocking transport: suspends the calling task at network I/O
#[async_trait]
pub trait AsyncTransport: Send + Sync + Debug {
    async fn execute(&self, envelope: RequestEnvelope) -> Result<RawResponse>;

    /// Release the underlying session; calling it again is a no-op
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// Blocking transport: the calling thread waits for the full response
pub trait BlockingTransport: Send + Sync + Debug {
    fn execute(&self, envelope: RequestEnvelope) -> Result<RawResponse>;

    /// Release the underlying session; calling it again is a no-op
    fn close(&self);

    fn is_closed(&self) -> bool;
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn map_send_error(err: reqwest::Error, timeout: Duration) -> BitpinError {
    if err.is_timeout() {
        BitpinError::Timeout { duration: timeout }
    } else {
        BitpinError::Http(err)
    }
}

/// `AsyncTransport` over one long-lived `reqwest::Client`
#[derive(Debug)]
pub struct ReqwestTransport {
    session: RwLock<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    /// Build the session that every call reuses until `close`
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            session: RwLock::new(Some(client)),
        })
    }

    fn session(&self) -> Result<reqwest::Client> {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone().ok_or(BitpinError::ConnectionClosed)
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn execute(&self, envelope: RequestEnvelope) -> Result<RawResponse> {
        let client = self.session()?;
        let url = envelope.url();
        debug!(method = %envelope.method, %url, signed = envelope.signed, "sending request");

        let mut builder = client
            .request(envelope.method.into(), &url)
            .timeout(envelope.timeout);
        for (name, value) in &envelope.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &envelope.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_send_error(err, envelope.timeout))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| map_send_error(err, envelope.timeout))?;

        Ok(RawResponse {
            method: envelope.method,
            url,
            status,
            body,
        })
    }

    fn close(&self) {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("async HTTP session closed");
        }
    }

    fn is_closed(&self) -> bool {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        guard.is_none()
    }
}

/// `BlockingTransport` over one long-lived `reqwest::blocking::Client`
#[derive(Debug)]
pub struct BlockingReqwestTransport {
    session: RwLock<Option<reqwest::blocking::Client>>,
}

impl BlockingReqwestTransport {
    /// Build the session that every call reuses until `close`.
    ///
    /// Must not be called from inside an async runtime.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .default_headers(default_headers())
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            session: RwLock::new(Some(client)),
        })
    }

    fn session(&self) -> Result<reqwest::blocking::Client> {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone().ok_or(BitpinError::ConnectionClosed)
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    fn execute(&self, envelope: RequestEnvelope) -> Result<RawResponse> {
        let client = self.session()?;
        let url = envelope.url();
        debug!(method = %envelope.method, %url, signed = envelope.signed, "sending request");

        let mut builder = client
            .request(envelope.method.into(), &url)
            .timeout(envelope.timeout);
        for (name, value) in &envelope.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &envelope.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|err| map_send_error(err, envelope.timeout))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| map_send_error(err, envelope.timeout))?;

        Ok(RawResponse {
            method: envelope.method,
            url,
            status,
            body,
        })
    }

    fn close(&self) {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("blocking HTTP session closed");
        }
    }

    fn is_closed(&self) -> bool {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        guard.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestOptions;
    use crate::types::RequestMethod;

    fn envelope() -> RequestEnvelope {
        crate::http::request::build_envelope(
            RequestMethod::Get,
            "http://127.0.0.1:9/v1/usr/info/".to_string(),
            false,
            None,
            Duration::from_secs(1),
            &RequestOptions::default(),
            RequestOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_async_close_is_idempotent() {
        let transport = ReqwestTransport::new(Duration::from_secs(1)).unwrap();
        assert!(!transport.is_closed());

        transport.close();
        transport.close();
        assert!(transport.is_closed());

        let err = transport.execute(envelope()).await.unwrap_err();
        assert!(matches!(err, BitpinError::ConnectionClosed));
    }

    #[test]
    fn test_blocking_close_is_idempotent() {
        let transport = BlockingReqwestTransport::new(Duration::from_secs(1)).unwrap();
        transport.close();
        transport.close();
        assert!(transport.is_closed());

        let err = transport.execute(envelope()).unwrap_err();
        assert!(matches!(err, BitpinError::ConnectionClosed));
    }
}
