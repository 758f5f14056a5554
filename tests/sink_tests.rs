use std::net::SocketAddr;
use std::time::Duration;

use botdeck::adapter::inbound::websocket::{ack, AuditLog, SinkServer, WELCOME};
use botdeck::adapter::outbound::sqlite::SqliteTelemetryStore;
use botdeck::application::ingest::TelemetrySink;
use botdeck::domain::telemetry::TableName;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Harness {
    _dir: tempfile::TempDir,
    addr: SocketAddr,
    store: SqliteTelemetryStore,
    audit_path: std::path::PathBuf,
    shutdown: watch::Sender<bool>,
}

async fn start_sink() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("telemetry.db");
    let audit_path = dir.path().join("websocket.log");

    let store = SqliteTelemetryStore::open(&db_path.display().to_string()).unwrap();
    let audit = AuditLog::open(&audit_path).unwrap();
    let server = SinkServer::bind(
        "127.0.0.1:0".parse().unwrap(),
        TelemetrySink::new(store.clone()),
        audit,
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown, rx) = watch::channel(false);
    tokio::spawn(server.run(rx));

    Harness {
        _dir: dir,
        addr,
        store,
        audit_path,
        shutdown,
    }
}

async fn connect(addr: SocketAddr) -> Client {
    let (mut ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
    assert_eq!(next_text(&mut ws).await, WELCOME);
    ws
}

async fn next_text(ws: &mut Client) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("frame within timeout")
        .expect("stream open")
        .expect("valid frame");
    match frame {
        Message::Text(text) => text.to_string(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn send(ws: &mut Client, raw: &str) -> String {
    ws.send(Message::Text(raw.to_string())).await.unwrap();
    next_text(ws).await
}

fn frame(base: &str, quote: &str, interval: &str) -> String {
    let log = json!({
        "data": {
            "bot_name": "trendr-btc-1h",
            "symbol": format!("{base}{quote}"),
            "interval": interval,
            "base_currency": base,
            "quote_currency": quote,
            "total_profit_loss": "12.5",
            "total_trades": 4,
            "market_action": "buy",
            "market_price": 64000.5
        }
    });
    json!({ "log": log.to_string() }).to_string()
}

/// Audit lines are written by a background thread; wait for `needle`.
async fn audit_containing(path: &std::path::Path, needle: &str) -> String {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let contents = std::fs::read_to_string(path).unwrap_or_default();
        if contents.contains(needle) || tokio::time::Instant::now() >= deadline {
            return contents;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn btcusdt_1h() -> TableName {
    TableName::derive("BTC", "USDT", "1h").unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn valid_frame_is_stored_and_acknowledged() {
    let sink = start_sink().await;
    let mut ws = connect(sink.addr).await;

    let raw = frame("BTC", "USDT", "1h");
    assert_eq!(send(&mut ws, &raw).await, ack(&raw));

    assert_eq!(sink.store.tables().await.unwrap(), vec!["btcusdt_1h"]);
    assert_eq!(sink.store.row_count(&btcusdt_1h()).await.unwrap(), 1);

    let received = format!("] Received message: {raw}");
    let audit = audit_containing(&sink.audit_path, &received).await;
    assert!(audit.contains(&received));
    assert!(audit.contains("] New client connected"));

    let _ = sink.shutdown.send(true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_frames_are_acknowledged_but_not_stored() {
    let sink = start_sink().await;
    let mut ws = connect(sink.addr).await;

    for raw in [
        "not json".to_string(),
        json!({ "status": "alive" }).to_string(),
        json!({ "log": "{broken" }).to_string(),
        frame("BTC\"; DROP TABLE x;--", "USDT", "1h"),
        frame("BTC", "USDT", "2h"),
    ] {
        assert_eq!(send(&mut ws, &raw).await, ack(&raw));
    }

    // The connection is still usable after rejected frames
    let raw = frame("ETH", "USDT", "5m");
    assert_eq!(send(&mut ws, &raw).await, ack(&raw));

    assert_eq!(sink.store.tables().await.unwrap(), vec!["ethusdt_5m"]);

    let _ = sink.shutdown.send(true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_writers_share_one_table() {
    let sink = start_sink().await;
    let mut first = connect(sink.addr).await;
    let mut second = connect(sink.addr).await;

    let raw = frame("BTC", "USDT", "1h");
    let (a, b) = tokio::join!(send(&mut first, &raw), send(&mut second, &raw));
    assert_eq!(a, ack(&raw));
    assert_eq!(b, ack(&raw));

    assert_eq!(sink.store.tables().await.unwrap(), vec!["btcusdt_1h"]);
    assert_eq!(sink.store.row_count(&btcusdt_1h()).await.unwrap(), 2);

    let _ = sink.shutdown.send(true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ping_is_answered_with_pong() {
    let sink = start_sink().await;
    let mut ws = connect(sink.addr).await;

    ws.send(Message::Ping(b"hb".to_vec())).await.unwrap();
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(frame, Message::Pong(b"hb".to_vec()));

    let _ = sink.shutdown.send(true);
}
