//! Latest-quote lookup against the chart v8 endpoint.
//!
//! The flow is: normalize the ticker, request
//! `.../chart/{SYMBOL}?interval=1d&range=1d` (retrying while rate limited),
//! then decode `chart.result[0].meta` into a [`Quote`].

mod fetch;
mod wire;

use tokio_util::sync::CancellationToken;

use crate::core::{Quote, QuoteClient, QuoteError};

/// Trim whitespace and upper-case a raw ticker.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidSymbol`] if nothing is left after trimming.
pub fn normalize_symbol(raw: &str) -> Result<String, QuoteError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(QuoteError::InvalidSymbol);
    }
    Ok(symbol)
}

/// Fetch the latest quote for `ticker`.
///
/// The ticker is normalized first, so `" aapl "` is requested (and echoed
/// back) as `AAPL`. Once `cancel` fires, the in-flight attempt is abandoned
/// and no further attempt starts.
///
/// # Errors
///
/// - [`QuoteError::InvalidSymbol`] for an empty ticker (no request is made).
/// - [`QuoteError::NotFound`] when the provider has no price for the symbol.
/// - [`QuoteError::RateLimited`] when every attempt was answered with 429.
/// - [`QuoteError::Transport`], [`QuoteError::Timeout`], [`QuoteError::Status`]
///   or [`QuoteError::Malformed`] for provider-side failures.
/// - [`QuoteError::Cancelled`] if `cancel` fired first.
#[tracing::instrument(skip(client, cancel), fields(symbol = tracing::field::Empty))]
pub async fn fetch_quote(
    client: &QuoteClient,
    ticker: &str,
    cancel: &CancellationToken,
) -> Result<Quote, QuoteError> {
    let symbol = normalize_symbol(ticker)?;
    tracing::Span::current().record("symbol", symbol.as_str());

    let result = fetch::fetch_chart(client, &symbol, cancel).await;
    match &result {
        Ok(q) => tracing::debug!(price = %q.price, currency = %q.currency, "quote fetched"),
        Err(e) if e.is_upstream() => tracing::warn!(error = %e, "provider failure"),
        Err(e) => tracing::debug!(error = %e, "no quote"),
    }
    result
}
