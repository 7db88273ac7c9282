use httpmock::Method::GET;
use std::time::{Duration, Instant};
use ticker_search::{QuoteClient, QuoteError, RetryConfig, fetch_quote};
use tokio_util::sync::CancellationToken;

use crate::common::{chart_base, client_for, setup_server};

#[tokio::test]
async fn three_429s_exhaust_the_budget_with_linear_backoff() {
    let server = setup_server();
    let throttled = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/AMD");
        then.status(429).body("Too Many Requests");
    });

    // Default policy: 3 attempts, 300ms then 600ms between them.
    let client = QuoteClient::builder()
        .base_chart(chart_base(&server))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = fetch_quote(&client, "amd", &CancellationToken::new())
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    throttled.assert_hits(3);
    match err {
        QuoteError::RateLimited { url } => assert!(url.contains("/v8/finance/chart/AMD")),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert!(
        elapsed >= Duration::from_millis(900),
        "expected at least 300ms + 600ms of backoff, got {elapsed:?}"
    );
}

#[tokio::test]
async fn non_429_failure_is_not_retried() {
    let server = setup_server();
    let failing = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/FAIL");
        then.status(503).body("Service Unavailable");
    });
    let client = client_for(&server);

    let err = fetch_quote(&client, "FAIL", &CancellationToken::new())
        .await
        .unwrap_err();

    failing.assert_hits(1);
    match err {
        QuoteError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.contains("/v8/finance/chart/FAIL"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn disabled_retry_reports_rate_limit_after_one_attempt() {
    let server = setup_server();
    let throttled = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/AAPL");
        then.status(429);
    });

    let client = QuoteClient::builder()
        .base_chart(chart_base(&server))
        .retry_enabled(false)
        .build()
        .unwrap();

    let err = fetch_quote(&client, "AAPL", &CancellationToken::new())
        .await
        .unwrap_err();

    throttled.assert_hits(1);
    assert!(matches!(err, QuoteError::RateLimited { .. }));
}

#[tokio::test]
async fn custom_attempt_budget_is_honored() {
    let server = setup_server();
    let throttled = server.mock(|when, then| {
        when.method(GET).path("/v8/finance/chart/AAPL");
        then.status(429);
    });

    let client = QuoteClient::builder()
        .base_chart(chart_base(&server))
        .retry_config(RetryConfig {
            max_attempts: 5,
            ..crate::common::fast_retry()
        })
        .build()
        .unwrap();

    let err = fetch_quote(&client, "AAPL", &CancellationToken::new())
        .await
        .unwrap_err();

    throttled.assert_hits(5);
    assert!(matches!(err, QuoteError::RateLimited { .. }));
}
