//! `HttpPriceExtractor` against a local fixture server.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use rust_decimal_macros::dec;
use tokio::net::TcpListener;
use url::Url;

use pricewatch::config::DEFAULT_USER_AGENT;
use pricewatch::probe::{ExtractError, HttpPriceExtractor, PriceExtractor, PriceProbe, ProbeResult};

async fn product_page() -> Html<&'static str> {
    Html("<html><body><h1>Lamp</h1><div>Now only <b>$ 1,049.00</b></div></body></html>")
}

async fn empty_page() -> Html<&'static str> {
    Html("<html><body>Out of stock</body></html>")
}

async fn slow_page() -> Html<&'static str> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Html("<p>$ 1.00</p>")
}

async fn spawn_fixture() -> SocketAddr {
    let app = Router::new()
        .route("/item", get(product_page))
        .route("/empty", get(empty_page))
        .route("/slow", get(slow_page))
        .route("/gone", get(|| async { StatusCode::NOT_FOUND }));

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("fixture listener must bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("fixture listener has an address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn extractor(timeout: Duration) -> HttpPriceExtractor {
    let Ok(extractor) = HttpPriceExtractor::new(DEFAULT_USER_AGENT, timeout) else {
        panic!("client must build");
    };
    extractor
}

fn url(addr: SocketAddr, path: &str) -> Url {
    let Ok(url) = Url::parse(&format!("http://{addr}{path}")) else {
        panic!("fixture url must parse");
    };
    url
}

#[tokio::test]
async fn finds_price_on_page() {
    let addr = spawn_fixture().await;
    let result = extractor(Duration::from_secs(5))
        .extract(&url(addr, "/item"))
        .await;
    assert_eq!(result, Ok(Some(dec!(1049.00))));
}

#[tokio::test]
async fn page_without_price_is_none() {
    let addr = spawn_fixture().await;
    let result = extractor(Duration::from_secs(5))
        .extract(&url(addr, "/empty"))
        .await;
    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn error_status_is_reported() {
    let addr = spawn_fixture().await;
    let result = extractor(Duration::from_secs(5))
        .extract(&url(addr, "/gone"))
        .await;
    assert_eq!(result, Err(ExtractError::HttpStatus(404)));
}

#[tokio::test]
async fn slow_page_times_out() {
    let addr = spawn_fixture().await;
    let result = extractor(Duration::from_millis(200))
        .extract(&url(addr, "/slow"))
        .await;
    assert_eq!(result, Err(ExtractError::Timeout));
}

#[tokio::test]
async fn closed_port_is_a_connect_failure() {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("listener must bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has an address");
    };
    drop(listener);

    let result = extractor(Duration::from_secs(5))
        .extract(&url(addr, "/item"))
        .await;
    assert_eq!(result, Err(ExtractError::Connect));
}

#[tokio::test]
async fn probe_maps_http_failures_to_inaccessible() {
    let addr = spawn_fixture().await;
    let probe = PriceProbe::new(
        std::sync::Arc::new(extractor(Duration::from_secs(5))),
        Duration::from_secs(5),
    );

    let found = probe.probe_url(&url(addr, "/item")).await;
    assert_eq!(found, ProbeResult::Accessible { price: dec!(1049.00) });

    let missing = probe.probe_url(&url(addr, "/gone")).await;
    assert_eq!(
        missing,
        ProbeResult::Inaccessible {
            reason: "http status 404".to_string()
        }
    );
}
