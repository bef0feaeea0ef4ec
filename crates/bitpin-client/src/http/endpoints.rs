/*
[INPUT]:  Operation arguments (page, market id, order type, typed queries)
[OUTPUT]: ApiCall values describing verb, path, signing and version
[POS]:    HTTP layer - fixed endpoint table shared by both client flavours
[UPDATE]: When Bitpin adds, moves or re-versions an endpoint
*/

use serde_json::Map;
use url::form_urlencoded;

use crate::http::{BitpinError, RequestOptions, Result};
use crate::types::{
    ApiEnum, ApiVersion, CreateOrderRequest, OrderType, RequestMethod, UserOrdersQuery,
    UserTradesQuery,
};

/// Static description of one remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: RequestMethod,
    pub signed: bool,
    /// `None` uses the configured default version
    pub version: Option<ApiVersion>,
}

impl Endpoint {
    const fn new(path: &'static str, method: RequestMethod, signed: bool) -> Self {
        Self {
            path,
            method,
            signed,
            version: None,
        }
    }

    const fn versioned(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }
}

pub const LOGIN: Endpoint = Endpoint::new("usr/api/login/", RequestMethod::Post, false);
pub const REFRESH_TOKEN: Endpoint = Endpoint::new("usr/refresh_token/", RequestMethod::Post, false);
pub const USER_INFO: Endpoint = Endpoint::new("usr/info/", RequestMethod::Get, true);
pub const CURRENCIES: Endpoint = Endpoint::new("mkt/currencies/?page={page}", RequestMethod::Get, false);
pub const MARKETS: Endpoint = Endpoint::new("mkt/markets/?page={page}", RequestMethod::Get, false);
pub const WALLETS: Endpoint = Endpoint::new("wlt/wallets/", RequestMethod::Get, true);
pub const ORDERBOOK: Endpoint =
    Endpoint::new("mth/actives/{market_id}/?type={type}", RequestMethod::Get, false).versioned(ApiVersion::V2);
pub const RECENT_TRADES: Endpoint = Endpoint::new("mth/matches/{market_id}/", RequestMethod::Get, false);
pub const USER_ORDERS: Endpoint = Endpoint::new("odr/orders/", RequestMethod::Get, true);
pub const CREATE_ORDER: Endpoint = Endpoint::new("odr/orders/", RequestMethod::Post, true);
pub const CANCEL_ORDER: Endpoint = Endpoint::new("odr/orders/{order_id}/", RequestMethod::Delete, true);
pub const USER_TRADES: Endpoint = Endpoint::new("odr/matches/?type={type}", RequestMethod::Get, true);

/// One concrete call: an endpoint with its path filled in and caller options
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: RequestMethod,
    pub path: String,
    pub signed: bool,
    pub version: Option<ApiVersion>,
    pub options: RequestOptions,
}

impl ApiCall {
    /// Call an endpoint whose path has no placeholders
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_path(endpoint, endpoint.path.to_string())
    }

    fn with_path(endpoint: Endpoint, path: String) -> Self {
        Self {
            method: endpoint.method,
            path,
            signed: endpoint.signed,
            version: endpoint.version,
            options: RequestOptions::default(),
        }
    }

    /// Replace the caller options passed through to the request builder.
    ///
    /// A payload the operation already set is merged under the new body.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        let own = self.options;
        self.options = options.merged_over(&own);
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub(crate) fn with_payload(mut self, payload: Map<String, serde_json::Value>) -> Self {
        if !payload.is_empty() {
            self.options.body = Some(payload);
        }
        self
    }

    /// Absolute URI against `base_url`
    pub fn uri(&self, base_url: &str, default_version: ApiVersion) -> String {
        let version = self.version.unwrap_or(default_version);
        format!("{}/{}/{}", base_url.trim_end_matches('/'), version, self.path)
    }

    pub fn user_info() -> Self {
        Self::new(USER_INFO)
    }

    pub fn currencies(page: u32) -> Self {
        Self::with_path(CURRENCIES, CURRENCIES.path.replace("{page}", &page.to_string()))
    }

    pub fn markets(page: u32) -> Self {
        Self::with_path(MARKETS, MARKETS.path.replace("{page}", &page.to_string()))
    }

    pub fn wallets() -> Self {
        Self::new(WALLETS)
    }

    pub fn orderbook(market_id: u64, order_type: OrderType) -> Self {
        let path = ORDERBOOK
            .path
            .replace("{market_id}", &market_id.to_string())
            .replace("{type}", order_type.as_str());
        Self::with_path(ORDERBOOK, path)
    }

    pub fn recent_trades(market_id: u64) -> Self {
        let path = RECENT_TRADES
            .path
            .replace("{market_id}", &market_id.to_string());
        Self::with_path(RECENT_TRADES, path)
    }

    pub fn user_orders(query: &UserOrdersQuery) -> Self {
        Self::new(USER_ORDERS).with_payload(query.to_payload())
    }

    pub fn create_order(order: &CreateOrderRequest) -> Self {
        Self::new(CREATE_ORDER).with_payload(order.to_payload())
    }

    /// Fails on an id that cannot name a single path segment
    pub fn cancel_order(order_id: &str) -> Result<Self> {
        let order_id = order_id.trim();
        if matches!(order_id, "" | "." | "..") {
            return Err(BitpinError::Config(format!(
                "invalid order id for cancellation: {order_id:?}"
            )));
        }

        let path = CANCEL_ORDER.path.replace("{order_id}", &path_segment(order_id));
        Ok(Self::with_path(CANCEL_ORDER, path))
    }

    pub fn user_trades(query: &UserTradesQuery) -> Self {
        let path = match query.order_type {
            Some(order_type) => USER_TRADES.path.replace("{type}", order_type.as_str()),
            None => "odr/matches/".to_string(),
        };
        Self::with_path(USER_TRADES, path).with_payload(query.to_payload())
    }
}

/// Percent-encode `raw` so it stays one path segment
fn path_segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
