/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared mock server setup, login mocks and JSON fixtures
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for bitpin-client tests

#![allow(dead_code)]

use bitpin_client::{ClientConfig, Credentials};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "test-api-secret";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client configuration pointed at the mock server
pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default().with_base_url(server.uri())
}

pub fn test_credentials() -> Credentials {
    Credentials {
        api_key: Some(API_KEY.to_string()),
        api_secret: Some(API_SECRET.to_string()),
        ..Default::default()
    }
}

/// Answer the login made with `test_credentials`
pub async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/usr/api/login/"))
        .and(body_json(json!({"api_key": API_KEY, "secret_key": API_SECRET})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"refresh": refresh, "access": access})),
        )
        .mount(server)
        .await;
}

/// Answer every refresh with `access`
pub async fn mount_refresh(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/usr/refresh_token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": access})))
        .mount(server)
        .await;
}

/// Number of requests the server received on `route`
pub async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == route)
        .count()
}

pub fn currency_json(id: u64, code: &str) -> Value {
    json!({
        "id": id,
        "title": code,
        "title_fa": code,
        "code": code,
        "tradable": true,
        "for_test": false,
        "decimal": 8,
        "high_risk": false,
        "withdraw_commission": "0.0005"
    })
}

pub fn market_json() -> Value {
    json!({
        "id": 1,
        "currency1": currency_json(1, "BTC"),
        "currency2": currency_json(2, "USDT"),
        "code": "BTC_USDT",
        "title": "Bitcoin/Tether",
        "commissions": {"maker": "0.002", "taker": "0.002"}
    })
}

/// Order as returned by `POST odr/orders/`
pub fn order_json(id: u64) -> Value {
    json!({
        "id": id,
        "market": market_json(),
        "amount1": "0.01",
        "amount2": "300",
        "price": "30000",
        "price_limit": null,
        "price_stop": null,
        "price_limit_oco": null,
        "type": "buy",
        "identifier": "bot-1",
        "mode": "limit",
        "state": "active",
        "fulfilled": 0.0,
        "remain_amount": "0.01",
        "average_price": "0",
        "req_to_cancel": false,
        "created_at": "2024-05-01T10:00:00Z",
        "activated_at": "2024-05-01T10:00:01Z",
        "closed_at": null
    })
}
