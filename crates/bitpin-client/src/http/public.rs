/*
[INPUT]:  Page numbers, market ids, order side
[OUTPUT]: Currencies, markets, order book and recent trades
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding public endpoints or changing their response models
*/

use serde_json::Value;

use crate::http::endpoints::ApiCall;
use crate::http::{BitpinClient, Result};
use crate::types::{OrderType, OrderbookResponse, RecentTradesResponse};

impl BitpinClient {
    /// List supported currencies
    ///
    /// GET mkt/currencies/?page={page}
    pub async fn get_currencies_info(&self, page: u32) -> Result<Value> {
        self.send(ApiCall::currencies(page)).await
    }

    /// List markets
    ///
    /// GET mkt/markets/?page={page}
    pub async fn get_markets_info(&self, page: u32) -> Result<Value> {
        self.send(ApiCall::markets(page)).await
    }

    /// Active orders on one side of a market
    ///
    /// GET v2 mth/actives/{market_id}/?type={buy|sell}
    pub async fn get_orderbook(
        &self,
        market_id: u64,
        order_type: OrderType,
    ) -> Result<OrderbookResponse> {
        self.send_as(ApiCall::orderbook(market_id, order_type)).await
    }

    /// GET mth/matches/{market_id}/
    pub async fn get_recent_trades(&self, market_id: u64) -> Result<RecentTradesResponse> {
        self.send_as(ApiCall::recent_trades(market_id)).await
    }
}
