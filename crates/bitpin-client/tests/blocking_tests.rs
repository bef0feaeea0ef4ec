/*
[INPUT]:  Mock HTTP responses served from a dedicated runtime
[OUTPUT]: Test results for the blocking client
[POS]:    Integration tests - thread-based client flavour
[UPDATE]: When the blocking surface or renewal threads change
*/

mod common;

use std::time::Duration;

use bitpin_client::{
    ApiCall, BitpinError, BlockingClient, CreateOrderRequest, Credentials, OrderMode, OrderType,
    OrderbookResponse, RequestOptions,
};
use common::{hits, mock_config, mount_login, mount_refresh, order_json, test_credentials};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::runtime::Runtime;
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server owned by its own runtime; the blocking client runs outside it
struct Harness {
    server: MockServer,
    runtime: Runtime,
}

impl Harness {
    fn start() -> Self {
        let runtime = Runtime::new().expect("runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn login(&self, access: &str, refresh: &str) {
        self.runtime
            .block_on(mount_login(&self.server, access, refresh));
    }

    fn hits(&self, route: &str) -> usize {
        self.runtime.block_on(hits(&self.server, route))
    }
}

#[test]
fn test_blocking_login_and_signed_call() {
    let harness = Harness::start();
    harness.login("access-1", "refresh-1");
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/v1/wlt/wallets/"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 3}]}))),
    );

    let client = assert_ok!(BlockingClient::new(mock_config(&harness.server), test_credentials()));
    assert_eq!(client.refresh_token().as_deref(), Some("refresh-1"));

    let wallets = assert_ok!(client.get_wallets());
    assert_eq!(wallets["results"][0]["id"], json!(3));
}

#[test]
fn test_blocking_public_market_data() {
    let harness = Harness::start();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/v1/mkt/currencies/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []}))),
    );
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/v2/mth/actives/1/"))
            .and(query_param("type", "sell"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orders": [{"amount": "1", "price": "2", "remain": "1", "value": "2"}],
                "volume": "2"
            }))),
    );

    let client = assert_ok!(BlockingClient::new(mock_config(&harness.server), Credentials::default()));
    assert_ok!(client.get_currencies_info(2));

    let book = assert_ok!(client.get_orderbook(1, OrderType::Sell));
    assert_eq!(book.orders[0].value, Decimal::from(2));
}

#[test]
fn test_blocking_create_and_cancel_order() {
    let harness = Harness::start();
    harness.login("access-1", "refresh-1");
    harness.mount(
        Mock::given(method("POST"))
            .and(path("/v1/odr/orders/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(order_json(31))),
    );
    harness.mount(
        Mock::given(method("DELETE"))
            .and(path("/v1/odr/orders/31/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("")),
    );

    let client = assert_ok!(BlockingClient::new(mock_config(&harness.server), test_credentials()));
    let order = CreateOrderRequest::new(
        1,
        "0.01".parse().unwrap(),
        Decimal::from(30000),
        OrderMode::Limit,
        OrderType::Buy,
    );

    let created = assert_ok!(client.create_order(&order));
    let cancelled = assert_ok!(client.cancel_order(&created.id.to_string()));
    assert_eq!(cancelled.status, "success");
    assert_eq!(cancelled.id, "31");
}

#[test]
fn test_blocking_background_refresh_threads() {
    let harness = Harness::start();
    harness.login("access-1", "refresh-1");
    harness.runtime
        .block_on(mount_refresh(&harness.server, "access-bg"));

    let config = mock_config(&harness.server)
        .with_background_refresh_token(Duration::from_millis(10));
    let client = assert_ok!(BlockingClient::new(config, test_credentials()));

    std::thread::sleep(Duration::from_millis(150));
    assert!(harness.hits("/v1/usr/refresh_token/") >= 3);
    assert_eq!(client.access_token().as_deref(), Some("access-bg"));
    assert_eq!(client.refresh_token().as_deref(), Some("refresh-1"));

    client.close_connection();
    std::thread::sleep(Duration::from_millis(50));
    assert!(client.background_tasks().iter().all(|task| task.is_finished()));
}

#[test]
fn test_blocking_close_connection_is_idempotent() {
    let harness = Harness::start();
    let client = assert_ok!(BlockingClient::new(mock_config(&harness.server), Credentials::default()));

    client.close_connection();
    client.close_connection();

    let err = client.get_markets_info(1).unwrap_err();
    assert!(matches!(err, BitpinError::ConnectionClosed));
}

#[test]
fn test_blocking_typed_send_with_options() {
    let harness = Harness::start();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/v2/mth/actives/2/"))
            .and(query_param("type", "buy"))
            .and(header("x-client", "desk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orders": [],
                "volume": "0"
            }))),
    );

    let client = assert_ok!(BlockingClient::new(mock_config(&harness.server), Credentials::default()));
    let call = ApiCall::orderbook(2, OrderType::Buy)
        .with_options(RequestOptions::new().header("X-Client", "desk"));

    let book: OrderbookResponse = assert_ok!(client.send_as(call));
    assert!(book.orders.is_empty());
    assert_eq!(book.volume, "0");
}
