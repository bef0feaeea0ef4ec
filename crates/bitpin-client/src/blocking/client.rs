/*
[INPUT]:  ClientConfig, Credentials, a BlockingTransport
[OUTPUT]: Logged-in blocking Bitpin client with optional renewal threads
[POS]:    Blocking layer - thread-based twin of the async client
[UPDATE]: When the async client's operations or lifecycle change
*/

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{Credentials, RenewalKind, RenewalTask, TokenStore};
use crate::config::ClientConfig;
use crate::http::client_core::{ClientCore, decode};
use crate::http::{
    ApiCall, BlockingReqwestTransport, BlockingTransport, RequestOptions, Result,
};
use crate::types::{
    CancelOrderResponse, CreateOrderRequest, CreateOrderResponse, LoginResponse, OrderType,
    OrderbookResponse, RecentTradesResponse, RefreshTokenResponse, UserOrdersQuery,
    UserOrdersResponse, UserTradesQuery,
};

#[derive(Debug)]
struct ClientInner {
    core: ClientCore,
    transport: Arc<dyn BlockingTransport>,
}

impl ClientInner {
    fn execute(&self, call: ApiCall) -> Result<Value> {
        let envelope = self.core.build_request(call);
        let response = self.transport.execute(envelope)?;
        self.core.normalize_response(response)
    }

    fn login(&self) -> Result<LoginResponse> {
        let value = self.execute(self.core.login_call(RequestOptions::default()))?;
        self.core.apply_login(value)
    }

    fn refresh(&self, refresh_token: Option<&str>) -> Result<RefreshTokenResponse> {
        let value = self.execute(self.core.refresh_call(refresh_token, RequestOptions::default()))?;
        self.core.apply_refresh(value)
    }
}

/// Blocking Bitpin REST client.
///
/// Every call holds the calling thread until the response arrives. Must not be
/// constructed or dropped inside an async runtime; use `BitpinClient` there.
#[derive(Debug)]
pub struct BlockingClient {
    inner: Arc<ClientInner>,
    renewals: Vec<RenewalTask>,
}

impl BlockingClient {
    /// Connect with the blocking reqwest transport, log in when key and secret
    /// are known, then start the configured renewal threads.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let transport = BlockingReqwestTransport::new(config.connect_timeout)?;
        Self::with_transport(config, credentials, Arc::new(transport))
    }

    /// Default configuration, credentials from `BITPIN_*` variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::default(), Credentials::from_env())
    }

    pub fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: Arc<dyn BlockingTransport>,
    ) -> Result<Self> {
        let inner = Arc::new(ClientInner {
            core: ClientCore::new(config, credentials),
            transport,
        });

        if inner.core.credentials().can_login() {
            inner.login()?;
        } else {
            debug!("no API key/secret configured, skipping login");
        }

        let renewals = spawn_renewals(&inner)?;
        info!(
            base_url = %inner.core.config().base_url,
            renewals = renewals.len(),
            "bitpin blocking client ready"
        );

        Ok(Self { inner, renewals })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.core.config()
    }

    pub fn tokens(&self) -> &TokenStore {
        self.inner.core.tokens()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens().access_token()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().refresh_token()
    }

    pub fn background_tasks(&self) -> &[RenewalTask] {
        &self.renewals
    }

    /// Execute any call and return the normalized JSON result
    pub fn send(&self, call: ApiCall) -> Result<Value> {
        self.inner.execute(call)
    }

    /// `send` decoded into a typed model
    pub fn send_as<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T> {
        decode(self.send(call)?)
    }

    pub fn login(&self) -> Result<LoginResponse> {
        self.inner.login()
    }

    pub fn refresh_access_token(&self, refresh_token: Option<&str>) -> Result<RefreshTokenResponse> {
        self.inner.refresh(refresh_token)
    }

    pub fn get_user_info(&self) -> Result<Value> {
        self.send(ApiCall::user_info())
    }

    pub fn get_currencies_info(&self, page: u32) -> Result<Value> {
        self.send(ApiCall::currencies(page))
    }

    pub fn get_markets_info(&self, page: u32) -> Result<Value> {
        self.send(ApiCall::markets(page))
    }

    pub fn get_wallets(&self) -> Result<Value> {
        self.send(ApiCall::wallets())
    }

    pub fn get_orderbook(&self, market_id: u64, order_type: OrderType) -> Result<OrderbookResponse> {
        self.send_as(ApiCall::orderbook(market_id, order_type))
    }

    pub fn get_recent_trades(&self, market_id: u64) -> Result<RecentTradesResponse> {
        self.send_as(ApiCall::recent_trades(market_id))
    }

    pub fn get_user_orders(&self, query: &UserOrdersQuery) -> Result<UserOrdersResponse> {
        self.send_as(ApiCall::user_orders(query))
    }

    pub fn create_order(&self, order: &CreateOrderRequest) -> Result<CreateOrderResponse> {
        self.send_as(ApiCall::create_order(order))
    }

    pub fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse> {
        self.send_as(ApiCall::cancel_order(order_id)?)
    }

    pub fn get_user_trades(&self, query: &UserTradesQuery) -> Result<Value> {
        self.send(ApiCall::user_trades(query))
    }

    pub fn stop_background_tasks(&self) {
        for task in &self.renewals {
            task.stop();
        }
    }

    /// Stop renewal threads and release the HTTP session; idempotent
    pub fn close_connection(&self) {
        self.stop_background_tasks();
        if !self.inner.transport.is_closed() {
            self.inner.transport.close();
            info!("bitpin blocking client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.transport.is_closed()
    }
}

fn spawn_renewals(inner: &Arc<ClientInner>) -> Result<Vec<RenewalTask>> {
    let config = inner.core.config();
    config
        .renewal_schedule()
        .into_iter()
        .map(|(kind, interval)| {
            let inner = Arc::clone(inner);
            let observer = config.renewal_observer.clone();
            match kind {
                RenewalKind::Relogin => {
                    RenewalTask::spawn_thread(kind, interval, observer, move || {
                        inner.login().map(drop)
                    })
                }
                RenewalKind::RefreshToken => {
                    RenewalTask::spawn_thread(kind, interval, observer, move || {
                        inner.refresh(None).map(drop)
                    })
                }
            }
        })
        .collect()
}
