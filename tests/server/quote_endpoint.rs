use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use chrono::Utc;
use futures::future::BoxFuture;
use rust_decimal::Decimal;
use ticker_search::{
    Quote, QuoteError, QuoteService,
    server::{AppState, Config, app_router, build_state},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::common::{mock_chart, mock_chart_status, setup_server};

/// Canned provider that records how often it was asked.
pub struct StubService {
    outcome: fn(&str) -> Result<Quote, QuoteError>,
    pub calls: AtomicUsize,
}

impl StubService {
    pub fn new(outcome: fn(&str) -> Result<Quote, QuoteError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn found() -> Arc<Self> {
        Self::new(|symbol| {
            Ok(Quote {
                ticker: symbol.to_string(),
                price: Decimal::from_str("189.42").unwrap(),
                currency: "USD".into(),
                exchange: "NMS".into(),
                fetched_at_utc: Utc::now(),
            })
        })
    }
}

impl QuoteService for StubService {
    fn fetch_quote<'a>(
        &'a self,
        ticker: &'a str,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Quote, QuoteError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = (self.outcome)(ticker);
        Box::pin(async move { outcome })
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn stub_app(stub: Arc<StubService>) -> axum::Router {
    app_router(
        AppState::new(stub, CancellationToken::new()),
        &Config::default(),
    )
}

#[tokio::test]
async fn blank_ticker_is_rejected_without_calling_the_provider() {
    let stub = StubService::found();

    for uri in ["/api/quote/%20%20", "/api/quote/%09", "/api/quote/", "/api/quote"] {
        let response = get(stub_app(stub.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["error"], "Ticker is required.");
    }

    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn undecodable_ticker_gets_a_json_error() {
    let stub = StubService::found();

    let response = get(stub_app(stub.clone()), "/api/quote/%FF").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await["error"], "Ticker is not valid.");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_receives_the_normalized_symbol() {
    let stub = StubService::found();

    let response = get(stub_app(stub.clone()), "/api/quote/%20tsla%20").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ticker"], "TSLA");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn error_kinds_map_to_status_codes() {
    let cases: [(fn(&str) -> Result<Quote, QuoteError>, StatusCode, &str); 5] = [
        (
            |s| Err(QuoteError::NotFound { symbol: s.to_string() }),
            StatusCode::NOT_FOUND,
            "Ticker 'AAPL' was not found.",
        ),
        (
            |_| Err(QuoteError::RateLimited { url: "u".into() }),
            StatusCode::TOO_MANY_REQUESTS,
            "Market data provider rate limit reached. Please retry shortly.",
        ),
        (
            |_| Err(QuoteError::Timeout { url: "u".into() }),
            StatusCode::GATEWAY_TIMEOUT,
            "Request to market data provider timed out.",
        ),
        (
            |_| Err(QuoteError::Malformed("json parse error".into())),
            StatusCode::BAD_GATEWAY,
            "Unexpected response from market data provider.",
        ),
        (
            |_| Err(QuoteError::Status { status: 500, url: "u".into() }),
            StatusCode::BAD_GATEWAY,
            "Market data provider responded with status 500.",
        ),
    ];

    for (outcome, status, message) in cases {
        let response = get(stub_app(StubService::new(outcome)), "/api/quote/aapl").await;
        assert_eq!(response.status(), status);
        assert_eq!(body_json(response).await["error"], message);
    }
}

fn live_config(server: &httpmock::MockServer) -> Config {
    let mut config = Config::default();
    config.upstream_base = url::Url::parse(&format!("{}/", server.base_url())).unwrap();
    config
}

#[tokio::test]
async fn end_to_end_quote_from_mock_provider() {
    let server = setup_server();
    let mock = mock_chart(&server, "AAPL");
    let config = live_config(&server);
    let state = build_state(&config, CancellationToken::new()).unwrap();

    let response = get(app_router(state, &config), "/api/quote/aapl").await;

    mock.assert();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(
        Decimal::from_str(&body["price"].to_string()).unwrap(),
        Decimal::from_str("189.42").unwrap()
    );
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["exchange"], "NMS");
    assert!(body["fetchedAtUtc"].is_string());
}

#[tokio::test]
async fn end_to_end_unknown_ticker_is_404() {
    let server = setup_server();
    let mock = mock_chart_status(&server, "NOPE", 404, r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#);
    let config = live_config(&server);
    let state = build_state(&config, CancellationToken::new()).unwrap();

    let response = get(app_router(state, &config), "/api/quote/nope").await;

    mock.assert();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Ticker 'NOPE' was not found.");
}

#[tokio::test]
async fn shutdown_cancels_requests() {
    let server = setup_server();
    let mock = mock_chart(&server, "AAPL");
    let config = live_config(&server);
    let shutdown = CancellationToken::new();
    let state = build_state(&config, shutdown.clone()).unwrap();
    shutdown.cancel();

    let response = get(app_router(state, &config), "/api/quote/AAPL").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    mock.assert_hits(0);
}
