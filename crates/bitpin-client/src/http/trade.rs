/*
[INPUT]:  Order requests and order/trade filters
[OUTPUT]: Created orders, cancellation results, order and trade history
[POS]:    HTTP layer - trading endpoints (Bearer auth)
[UPDATE]: When adding trading endpoints or changing order flow
*/

use serde_json::Value;

use crate::http::endpoints::ApiCall;
use crate::http::{BitpinClient, Result};
use crate::types::{
    CancelOrderResponse, CreateOrderRequest, CreateOrderResponse, UserOrdersQuery,
    UserOrdersResponse, UserTradesQuery,
};

impl BitpinClient {
    /// Orders of the logged-in account, filtered by `query`
    ///
    /// GET odr/orders/?{filters}
    pub async fn get_user_orders(&self, query: &UserOrdersQuery) -> Result<UserOrdersResponse> {
        self.send_as(ApiCall::user_orders(query)).await
    }

    /// Place an order
    ///
    /// POST odr/orders/
    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<CreateOrderResponse> {
        self.send_as(ApiCall::create_order(order)).await
    }

    /// Cancel an order; success carries the id taken from the request path
    ///
    /// DELETE odr/orders/{order_id}/
    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse> {
        self.send_as(ApiCall::cancel_order(order_id)?).await
    }

    /// Matched trades of the logged-in account
    ///
    /// GET odr/matches/?type={buy|sell}&market_id={id}
    pub async fn get_user_trades(&self, query: &UserTradesQuery) -> Result<Value> {
        self.send(ApiCall::user_trades(query)).await
    }
}
