/*
[INPUT]:  ClientConfig, Credentials, an AsyncTransport
[OUTPUT]: Logged-in async Bitpin client with optional background token renewal
[POS]:    HTTP layer - non-blocking client core and session lifecycle
[UPDATE]: When changing construction, renewal wiring or shutdown behaviour
*/

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{Credentials, RenewalKind, RenewalTask, TokenStore};
use crate::config::ClientConfig;
use crate::http::client_core::{ClientCore, decode};
use crate::http::endpoints::ApiCall;
use crate::http::transport::{AsyncTransport, ReqwestTransport};
use crate::http::{RequestOptions, Result};
use crate::types::{LoginResponse, RefreshTokenResponse};

#[derive(Debug)]
struct ClientInner {
    core: ClientCore,
    transport: Arc<dyn AsyncTransport>,
}

impl ClientInner {
    async fn execute(&self, call: ApiCall) -> Result<Value> {
        let envelope = self.core.build_request(call);
        let response = self.transport.execute(envelope).await?;
        self.core.normalize_response(response)
    }

    async fn login(&self) -> Result<LoginResponse> {
        let value = self
            .execute(self.core.login_call(RequestOptions::default()))
            .await?;
        self.core.apply_login(value)
    }

    async fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshTokenResponse> {
        let value = self
            .execute(self.core.refresh_call(refresh_token, RequestOptions::default()))
            .await?;
        self.core.apply_refresh(value)
    }
}

/// Non-blocking Bitpin REST client.
///
/// Cheap to share behind an `Arc`; every operation takes `&self`. Background
/// renewal tasks, when enabled, run on the ambient tokio runtime and stop when
/// the client is dropped or closed.
#[derive(Debug)]
pub struct BitpinClient {
    inner: Arc<ClientInner>,
    renewals: Vec<RenewalTask>,
}

impl BitpinClient {
    /// Connect with the reqwest transport, log in when key and secret are known,
    /// then start the configured background renewals.
    pub async fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let transport = ReqwestTransport::new(config.connect_timeout)?;
        Self::with_transport(config, credentials, Arc::new(transport)).await
    }

    /// Default configuration, credentials from `BITPIN_*` variables
    pub async fn from_env() -> Result<Self> {
        Self::new(ClientConfig::default(), Credentials::from_env()).await
    }

    /// Same as `new` over a caller-supplied transport
    pub async fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: Arc<dyn AsyncTransport>,
    ) -> Result<Self> {
        let inner = Arc::new(ClientInner {
            core: ClientCore::new(config, credentials),
            transport,
        });

        if inner.core.credentials().can_login() {
            inner.login().await?;
        } else {
            debug!("no API key/secret configured, skipping login");
        }

        let renewals = spawn_renewals(&inner);
        info!(
            base_url = %inner.core.config().base_url,
            renewals = renewals.len(),
            "bitpin client ready"
        );

        Ok(Self { inner, renewals })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.core.config()
    }

    /// Shared token store; clones observe every later login and refresh
    pub fn tokens(&self) -> &TokenStore {
        self.inner.core.tokens()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens().access_token()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().refresh_token()
    }

    /// Handles of the running background renewals
    pub fn background_tasks(&self) -> &[RenewalTask] {
        &self.renewals
    }

    /// Execute any call and return the normalized JSON result.
    ///
    /// Caller options travel on the call (`ApiCall::with_options`).
    pub async fn send(&self, call: ApiCall) -> Result<Value> {
        self.inner.execute(call).await
    }

    /// `send` decoded into a typed model, e.g.
    /// `send_as::<CreateOrderResponse>(ApiCall::create_order(&order).with_options(opts))`
    pub async fn send_as<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T> {
        decode(self.send(call).await?)
    }

    /// Log in with the configured key and secret and store both tokens
    ///
    /// POST usr/api/login/
    pub async fn login(&self) -> Result<LoginResponse> {
        self.inner.login().await
    }

    /// Exchange `refresh_token` (or the stored one) for a new access token
    ///
    /// POST usr/refresh_token/
    pub async fn refresh_access_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<RefreshTokenResponse> {
        self.inner.refresh(refresh_token).await
    }

    /// Signal every background renewal to stop
    pub fn stop_background_tasks(&self) {
        for task in &self.renewals {
            task.stop();
        }
    }

    /// Stop background renewals and release the HTTP session.
    ///
    /// Calling it again is a no-op; later requests fail with `ConnectionClosed`.
    pub fn close_connection(&self) {
        self.stop_background_tasks();
        if !self.inner.transport.is_closed() {
            self.inner.transport.close();
            info!("bitpin client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.transport.is_closed()
    }
}

fn spawn_renewals(inner: &Arc<ClientInner>) -> Vec<RenewalTask> {
    let config = inner.core.config();
    config
        .renewal_schedule()
        .into_iter()
        .map(|(kind, interval)| {
            let inner = Arc::clone(inner);
            let observer = config.renewal_observer.clone();
            match kind {
                RenewalKind::Relogin => RenewalTask::spawn_async(kind, interval, observer, move || {
                    let inner = Arc::clone(&inner);
                    async move { inner.login().await.map(drop) }
                }),
                RenewalKind::RefreshToken => {
                    RenewalTask::spawn_async(kind, interval, observer, move || {
                        let inner = Arc::clone(&inner);
                        async move { inner.refresh(None).await.map(drop) }
                    })
                }
            }
        })
        .collect()
}
