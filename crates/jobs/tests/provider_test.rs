//! Frankfurter client tests against a local HTTP listener.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal_macros::dec;
use tokio::net::TcpListener;
use worklio_core::currency::{RateSource, RefreshError};
use worklio_jobs::FrankfurterSource;
use worklio_shared::types::CurrencyCode;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn source(addr: SocketAddr) -> FrankfurterSource {
    FrankfurterSource::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

async fn quote(Query(params): Query<HashMap<String, String>>) -> Response {
    let base = params.get("from").cloned().unwrap_or_default();
    let body = format!(
        r#"{{"amount":1.0,"base":"{base}","date":"2024-03-15","rates":{{"EUR":0.92,"IDR":15650}}}}"#
    );
    ([("content-type", "application/json")], body).into_response()
}

#[tokio::test]
async fn test_latest_reads_rates_for_requested_base() {
    let addr = serve(Router::new().route("/latest", get(quote))).await;

    let snapshot = source(addr).latest(&CurrencyCode::usd()).await.unwrap();

    assert_eq!(snapshot.base, CurrencyCode::usd());
    assert_eq!(snapshot.rates.get("EUR"), Some(&dec!(0.92)));
    assert_eq!(snapshot.rates.get("IDR"), Some(&dec!(15650)));
}

#[tokio::test]
async fn test_latest_non_200_is_status_error() {
    let router = Router::new().route(
        "/latest",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let addr = serve(router).await;

    let err = source(addr)
        .latest(&CurrencyCode::usd())
        .await
        .unwrap_err();

    assert!(
        matches!(err, RefreshError::Status { status: 503, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_latest_malformed_body_is_rejected() {
    let router = Router::new().route("/latest", get(|| async { "<html>oops</html>" }));
    let addr = serve(router).await;

    let err = source(addr)
        .latest(&CurrencyCode::usd())
        .await
        .unwrap_err();

    assert!(
        matches!(err, RefreshError::MalformedBody { .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_latest_unreachable_provider_is_source_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(addr)
        .latest(&CurrencyCode::usd())
        .await
        .unwrap_err();

    assert!(matches!(err, RefreshError::Source { .. }), "{err:?}");
}
