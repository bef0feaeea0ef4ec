/*
[INPUT]:  Caller-supplied order/query options
[OUTPUT]: Outgoing JSON payloads built from explicit field allow-lists
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API request fields change
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{OrderMode, OrderState, OrderType};

/// Body of `POST usr/api/login/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
}

/// Body of `POST usr/refresh_token/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: Option<String>,
}

/// Body of `POST odr/orders/`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub market: u64,
    pub amount1: Decimal,
    pub price: Decimal,
    pub mode: OrderMode,
    pub order_type: OrderType,
    pub identifier: Option<String>,
    pub price_limit: Option<Decimal>,
    pub price_stop: Option<Decimal>,
    pub price_limit_oco: Option<Decimal>,
    pub amount2: Option<Decimal>,
}

impl CreateOrderRequest {
    pub fn new(
        market: u64,
        amount1: Decimal,
        price: Decimal,
        mode: OrderMode,
        order_type: OrderType,
    ) -> Self {
        Self {
            market,
            amount1,
            price,
            mode,
            order_type,
            identifier: None,
            price_limit: None,
            price_stop: None,
            price_limit_oco: None,
            amount2: None,
        }
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn price_limit(mut self, price_limit: Decimal) -> Self {
        self.price_limit = Some(price_limit);
        self
    }

    pub fn price_stop(mut self, price_stop: Decimal) -> Self {
        self.price_stop = Some(price_stop);
        self
    }

    pub fn price_limit_oco(mut self, price_limit_oco: Decimal) -> Self {
        self.price_limit_oco = Some(price_limit_oco);
        self
    }

    pub fn amount2(mut self, amount2: Decimal) -> Self {
        self.amount2 = Some(amount2);
        self
    }

    /// Wire payload; every value is sent as a string, absent fields are omitted.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = PayloadBuilder::default();
        payload
            .put("market", Some(self.market))
            .put("amount1", Some(self.amount1))
            .put("price", Some(self.price))
            .put("mode", Some(self.mode))
            .put("type", Some(self.order_type))
            .put("identifier", self.identifier.as_deref())
            .put("price_limit", self.price_limit)
            .put("price_stop", self.price_stop)
            .put("price_limit_oco", self.price_limit_oco)
            .put("amount2", self.amount2);
        payload.finish()
    }
}

/// Filters for `GET odr/orders/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserOrdersQuery {
    pub market_id: Option<u64>,
    pub order_type: Option<OrderType>,
    pub state: Option<OrderState>,
    pub mode: Option<OrderMode>,
    pub identifier: Option<String>,
}

impl UserOrdersQuery {
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = PayloadBuilder::default();
        payload
            .put("market_id", self.market_id)
            .put("type", self.order_type)
            .put("state", self.state)
            .put("mode", self.mode)
            .put("identifier", self.identifier.as_deref());
        payload.finish()
    }
}

/// Filters for `GET odr/matches/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserTradesQuery {
    pub market_id: Option<u64>,
    pub order_type: Option<OrderType>,
}

impl UserTradesQuery {
    /// Query fields other than `type`, which is carried by the path template
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = PayloadBuilder::default();
        payload.put("market_id", self.market_id);
        payload.finish()
    }
}

#[derive(Default)]
struct PayloadBuilder {
    fields: Map<String, Value>,
}

impl PayloadBuilder {
    fn put<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.fields
                .insert(key.to_string(), Value::String(value.to_string()));
        }
        self
    }

    fn finish(self) -> Map<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal literal")
    }

    #[test]
    fn test_create_order_payload_required_fields_only() {
        let req = CreateOrderRequest::new(1, dec("0.5"), dec("2500000"), OrderMode::Limit, OrderType::Buy);
        let payload = Value::Object(req.to_payload());

        assert_eq!(
            payload,
            serde_json::json!({
                "market": "1",
                "amount1": "0.5",
                "price": "2500000",
                "mode": "limit",
                "type": "buy",
            })
        );
    }

    #[test]
    fn test_create_order_payload_optional_fields() {
        let req = CreateOrderRequest::new(7, dec("1"), dec("100"), OrderMode::Oco, OrderType::Sell)
            .identifier("my-order")
            .price_limit_oco(dec("90"))
            .price_stop(dec("95"));
        let payload = req.to_payload();

        assert_eq!(payload.get("identifier"), Some(&Value::from("my-order")));
        assert_eq!(payload.get("price_limit_oco"), Some(&Value::from("90")));
        assert_eq!(payload.get("price_stop"), Some(&Value::from("95")));
        assert_eq!(payload.get("mode"), Some(&Value::from("oco")));
        assert!(!payload.contains_key("price_limit"));
        assert!(!payload.contains_key("amount2"));
    }

    #[test]
    fn test_user_orders_query_omits_missing_filters() {
        let query = UserOrdersQuery {
            market_id: Some(3),
            state: Some(OrderState::Active),
            ..Default::default()
        };
        let payload = query.to_payload();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("market_id"), Some(&Value::from("3")));
        assert_eq!(payload.get("state"), Some(&Value::from("active")));
        assert!(UserOrdersQuery::default().to_payload().is_empty());
    }

    #[test]
    fn test_user_trades_query_payload() {
        let query = UserTradesQuery {
            market_id: Some(12),
            order_type: Some(OrderType::Sell),
        };
        let payload = query.to_payload();
        assert_eq!(payload.get("market_id"), Some(&Value::from("12")));
        assert!(!payload.contains_key("type"));
    }
}
