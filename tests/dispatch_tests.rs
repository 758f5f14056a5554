mod support;

use std::time::Duration;

use botdeck::adapter::outbound::http::HttpBotTransport;
use botdeck::application::dispatch::Dispatcher;
use botdeck::domain::request::{BotStartRequest, Interval, PositiveAmount, TradeWindow};
use botdeck::error::{DispatchError, RemoteFailure};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::fixtures::{registry, statuses_body};

fn dispatcher(endpoint: &str) -> Dispatcher<HttpBotTransport> {
    let transport = HttpBotTransport::new(Duration::from_secs(5)).unwrap();
    Dispatcher::new(registry(endpoint), transport)
}

fn start_request() -> BotStartRequest {
    BotStartRequest {
        symbol: "ETHUSDT".into(),
        interval: Interval::FifteenMinutes,
        starting_trade_amount: PositiveAmount::new("starting_trade_amount", dec!(500)).unwrap(),
        trade_allocation: PositiveAmount::new("trade_allocation", dec!(12.5)).unwrap(),
        trade_window: TradeWindow::Minutes(45),
    }
}

#[tokio::test]
async fn statuses_resolves_key_case_insensitively() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(statuses_body(&[("trendr-btc-1h", "BTCUSDT", "1h")])),
        )
        .expect(3)
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri());
    for key in ["trendr", "TRENDR", "TrEnDr"] {
        let statuses = dispatcher.statuses(key).await.unwrap();
        assert_eq!(statuses.running_bots.len(), 1);
        assert_eq!(statuses.running_bots[0].bot_name, "trendr-btc-1h");
    }
}

#[tokio::test]
async fn start_posts_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start"))
        .and(body_json(json!({
            "symbol": "ETHUSDT",
            "interval": "15m",
            "starting_trade_amount": "500",
            "trade_allocation": "12.5",
            "trade_window": "45m"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Bot started" })))
        .expect(1)
        .mount(&server)
        .await;

    let response = dispatcher(&server.uri())
        .start("trendr", start_request())
        .await
        .unwrap();

    assert_eq!(response.message.as_deref(), Some("Bot started"));
}

#[tokio::test]
async fn non_success_surfaces_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stop"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Bot not running" })),
        )
        .mount(&server)
        .await;

    let err = dispatcher(&server.uri())
        .stop("trendr", "trendr-btc-1h")
        .await
        .unwrap_err();

    match &err {
        DispatchError::Remote(remote) => {
            assert_eq!(remote.kind, RemoteFailure::Status(404));
            assert_eq!(remote.message, "Bot not running");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Trendr: Bot not running");
}

#[tokio::test]
async fn non_success_without_message_uses_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = dispatcher(&server.uri()).statuses("trendr").await.unwrap_err();

    assert_eq!(err.to_string(), "Trendr: request failed with status 503");
}

#[tokio::test]
async fn empty_remote_message_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statuses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "" })))
        .mount(&server)
        .await;

    let err = dispatcher(&server.uri()).statuses("trendr").await.unwrap_err();

    assert_eq!(err.to_string(), "Trendr: request failed with status 500");
}

#[tokio::test]
async fn unknown_bot_issues_no_request() {
    let server = MockServer::start().await;

    let err = dispatcher(&server.uri()).statuses("grid").await.unwrap_err();

    assert_eq!(err, DispatchError::UnknownBot { key: "grid".into() });
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn unreachable_bot_is_a_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = dispatcher(&format!("http://{addr}"))
        .statuses("trendr")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Remote(ref remote) if remote.kind == RemoteFailure::Network
    ));
}

#[tokio::test]
async fn plain_text_reply_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok, stopping"))
        .mount(&server)
        .await;

    let response = dispatcher(&server.uri())
        .stop("trendr", "trendr-btc-1h")
        .await
        .unwrap();

    assert_eq!(response.message.as_deref(), Some("ok, stopping"));
}
