/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for the async client
[POS]:    Integration tests - HTTP endpoints and request assembly
[UPDATE]: When HTTP endpoints change
*/

mod common;

use std::time::Duration;

use bitpin_client::{
    ApiCall, BitpinClient, BitpinError, CreateOrderRequest, CreateOrderResponse, Credentials,
    OrderMode, OrderState, OrderType, RequestOptions, UserOrdersQuery, pick,
};
use common::{mock_config, mount_login, order_json, setup_mock_server, test_credentials};
use rust_decimal::Decimal;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn logged_in_client(server: &wiremock::MockServer) -> BitpinClient {
    mount_login(server, "access-1", "refresh-1").await;
    assert_ok!(BitpinClient::new(mock_config(server), test_credentials()).await)
}

#[tokio::test]
async fn test_currencies_page_is_in_path() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/mkt/currencies/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 1, "code": "BTC"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(BitpinClient::new(mock_config(&server), Credentials::default()).await);
    let currencies = assert_ok!(client.get_currencies_info(2).await);
    assert_eq!(currencies["results"][0]["code"], json!("BTC"));
}

#[tokio::test]
async fn test_signed_call_carries_login_token() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/usr/info/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 77})))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let info = assert_ok!(client.get_user_info().await);
    assert_eq!(info["id"], json!(77));
}

#[tokio::test]
async fn test_create_order_sends_string_payload() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/odr/orders/"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({
            "market": "1",
            "amount1": "0.01",
            "price": "30000",
            "mode": "limit",
            "type": "buy",
            "identifier": "bot-1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json(901)))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let order = CreateOrderRequest::new(
        1,
        "0.01".parse().unwrap(),
        Decimal::from(30000),
        OrderMode::Limit,
        OrderType::Buy,
    )
    .identifier("bot-1");

    let created = assert_ok!(client.create_order(&order).await);
    assert_eq!(created.id, 901);
    assert_eq!(created.market.code, "BTC_USDT");
    assert_eq!(created.price, Decimal::from(30000));
    assert_eq!(created.state, "active");
}

#[tokio::test]
async fn test_user_orders_filters_become_query() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/odr/orders/"))
        .and(query_param("market_id", "1"))
        .and(query_param("state", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [order_json(5)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let orders = assert_ok!(
        client
            .get_user_orders(&UserOrdersQuery {
                market_id: Some(1),
                state: Some(OrderState::Active),
                ..Default::default()
            })
            .await
    );
    assert_eq!(orders.count, Some(1));
    assert_eq!(orders.results[0].id, 5);
}

#[tokio::test]
async fn test_api_error_surfaces_detail() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/odr/orders/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Insufficient balance.",
            "result": {"code": "balance"}
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let order = CreateOrderRequest::new(
        1,
        Decimal::ONE,
        Decimal::ONE,
        OrderMode::Market,
        OrderType::Sell,
    );

    let err = client.create_order(&order).await.unwrap_err();
    match &err {
        BitpinError::Api {
            status_code,
            message,
            result,
            url,
        } => {
            assert_eq!(*status_code, 400);
            assert_eq!(message, "Insufficient balance.");
            assert_eq!(result, &Some(json!({"code": "balance"})));
            assert!(url.as_deref().unwrap_or_default().ends_with("/v1/odr/orders/"));
        }
        other => panic!("Expected Api error variant, got {other:?}"),
    }
    assert!(err.to_string().starts_with("APIError(code=400): Insufficient balance."));
}

#[tokio::test]
async fn test_invalid_success_body_is_request_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/mkt/markets/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = assert_ok!(BitpinClient::new(mock_config(&server), Credentials::default()).await);
    let err = client.get_markets_info(1).await.unwrap_err();
    assert!(matches!(err, BitpinError::Request(ref message) if message.contains("maintenance")));
}

#[tokio::test]
async fn test_requests_params_override_headers_and_timeout() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/mkt/markets/"))
        .and(header("x-trace", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = assert_ok!(BitpinClient::new(mock_config(&server), Credentials::default()).await);
    let overrides = json!({"requests_params": {"timeout": 0.05, "headers": {"X-Trace": "abc"}}});
    let call = ApiCall::markets(1)
        .with_options(RequestOptions::new().body(overrides.as_object().cloned().unwrap()));

    let err = client.send(call).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_default_request_params_are_applied() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/wlt/wallets/"))
        .and(header("x-client", "bitpin-rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server)
        .with_default_request_params(RequestOptions::new().header("X-Client", "bitpin-rs"));
    let client = assert_ok!(BitpinClient::new(config, Credentials::default()).await);
    assert_ok!(client.get_wallets().await);
}

#[tokio::test]
async fn test_pick_market_from_listing() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/mkt/markets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [{"id": 1, "code": "BTC_IRT"}, {"id": 2, "code": "ETH_IRT"}]
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(BitpinClient::new(mock_config(&server), Credentials::default()).await);
    let markets = assert_ok!(client.get_markets_info(1).await);
    let eth = assert_ok!(pick(markets, "code", &json!("ETH_IRT")));
    assert_eq!(eth["results"]["id"], json!(2));
}

#[tokio::test]
async fn test_close_connection_twice_then_calls_fail() {
    let server = setup_mock_server().await;
    let client = assert_ok!(BitpinClient::new(mock_config(&server), Credentials::default()).await);

    client.close_connection();
    client.close_connection();
    assert!(client.is_closed());

    let err = client.get_markets_info(1).await.unwrap_err();
    assert!(matches!(err, BitpinError::ConnectionClosed));
}

#[tokio::test]
async fn test_user_orders_identifier_with_reserved_characters() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/v1/odr/orders/"))
        .and(query_param("identifier", "bot#1&x=y"))
        .and(query_param("market_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let orders = assert_ok!(
        client
            .get_user_orders(&UserOrdersQuery {
                market_id: Some(1),
                identifier: Some("bot#1&x=y".to_string()),
                ..Default::default()
            })
            .await
    );
    assert!(orders.results.is_empty());

    let received = server.received_requests().await.unwrap_or_default();
    let query = received
        .iter()
        .find(|request| request.url.path() == "/v1/odr/orders/")
        .map(|request| request.url.query_pairs().into_owned().collect::<Vec<_>>())
        .expect("orders request");
    assert_eq!(query.len(), 2);
}

#[tokio::test]
async fn test_cancel_after_redirect_reports_requested_id() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/odr/orders/55/"))
        .respond_with(
            ResponseTemplate::new(307).insert_header("Location", "/v1/odr/archive/99/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/odr/archive/99/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let cancelled = assert_ok!(client.cancel_order("55").await);
    assert_eq!(cancelled.id, "55");
}

#[tokio::test]
async fn test_cancel_with_empty_id_never_reaches_server() {
    let server = setup_mock_server().await;
    let client = logged_in_client(&server).await;

    let err = client.cancel_order("").await.unwrap_err();
    assert!(matches!(err, BitpinError::Config(_)));
    assert_eq!(common::hits(&server, "/v1/odr/orders//").await, 0);
    assert_eq!(common::hits(&server, "/v1/odr/orders/").await, 0);
}

#[tokio::test]
async fn test_typed_result_with_per_call_options() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/v1/odr/orders/"))
        .and(header("x-trace", "order-42"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json(42)))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let order = CreateOrderRequest::new(
        1,
        Decimal::ONE,
        Decimal::from(30000),
        OrderMode::Limit,
        OrderType::Buy,
    );
    let call = ApiCall::create_order(&order)
        .with_options(RequestOptions::new().header("X-Trace", "order-42"));

    let created: CreateOrderResponse = assert_ok!(client.send_as(call).await);
    assert_eq!(created.id, 42);
}
