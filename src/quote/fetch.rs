use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::{Quote, QuoteClient, QuoteError, net};
use crate::quote::wire::{ChartEnvelope, MetaNode};

pub(crate) const DEFAULT_CURRENCY: &str = "USD";
pub(crate) const DEFAULT_EXCHANGE: &str = "Unknown";

/// Build `{base_chart}{symbol}?interval=1d&range=1d`, percent-encoding the symbol as one path segment.
pub(crate) fn chart_url(base_chart: &Url, symbol: &str) -> Result<Url, QuoteError> {
    let mut url = base_chart.clone();
    url.path_segments_mut()
        .map_err(|()| QuoteError::InvalidBase(base_chart.to_string()))?
        .pop_if_empty()
        .push(symbol);
    url.query_pairs_mut()
        .append_pair("interval", "1d")
        .append_pair("range", "1d");
    Ok(url)
}

/// One chart lookup for an already normalized symbol.
pub(crate) async fn fetch_chart(
    client: &QuoteClient,
    symbol: &str,
    cancel: &CancellationToken,
) -> Result<Quote, QuoteError> {
    let url = chart_url(client.base_chart(), symbol)?;

    let resp = client.send_with_retry(&url, cancel).await?;
    let status = resp.status();

    if status.as_u16() == 429 {
        return Err(QuoteError::RateLimited {
            url: url.to_string(),
        });
    }

    let body = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(QuoteError::Cancelled),
        r = net::get_text(resp, "chart", symbol, "json") => {
            r.map_err(|e| QuoteError::from_transport(e, &url))?
        }
    };

    if !status.is_success() {
        if chart_reports_error(&body) || status.as_u16() == 404 {
            return Err(QuoteError::NotFound {
                symbol: symbol.to_string(),
            });
        }
        return Err(QuoteError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    decode_chart(&body, symbol, Utc::now())
}

fn chart_reports_error(body: &str) -> bool {
    serde_json::from_str::<ChartEnvelope>(body)
        .ok()
        .and_then(|env| env.chart)
        .is_some_and(|chart| chart.error.is_some())
}

/// Turn a successful chart body into a [`Quote`].
///
/// Anything that parses but carries no usable price is `NotFound`; only a body
/// that is not a chart document at all is `Malformed`.
pub(crate) fn decode_chart(
    body: &str,
    symbol: &str,
    fetched_at_utc: DateTime<Utc>,
) -> Result<Quote, QuoteError> {
    let parsed: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| QuoteError::Malformed(format!("json parse error: {e}")))?;

    let chart = parsed
        .chart
        .ok_or_else(|| QuoteError::Malformed("missing chart".into()))?;

    let not_found = || QuoteError::NotFound {
        symbol: symbol.to_string(),
    };

    if let Some(err) = chart.error {
        tracing::debug!(symbol, error = %err, "provider reported chart error");
        return Err(not_found());
    }

    let meta: MetaNode = chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|r0| r0.meta)
        .ok_or_else(not_found)?;

    let price = match meta.regular_market_price {
        Some(serde_json::Value::Number(n)) => number_to_decimal(&n).ok_or_else(not_found)?,
        _ => return Err(not_found()),
    };

    Ok(Quote {
        ticker: symbol.to_string(),
        price,
        currency: meta.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        exchange: meta
            .exchange_name
            .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
        fetched_at_utc,
    })
}

/// Exact decimal from the number's textual form (no detour through `f64`).
fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    let text = n.to_string();
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).ok()
    } else {
        Decimal::from_str(&text).ok()
    }
}
