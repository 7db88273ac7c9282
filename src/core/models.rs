use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The latest market price for a single symbol, as returned to callers.
///
/// Built once from the provider's chart metadata and never mutated afterwards.
/// `fetched_at_utc` is the local time the quote was assembled, not the
/// provider's market timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Upper-cased, trimmed ticker symbol.
    #[schema(example = "AAPL")]
    pub ticker: String,
    /// Regular market price, carried as an exact decimal.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64, example = 189.42)]
    pub price: Decimal,
    /// Currency code reported by the provider (`USD` when missing).
    #[schema(example = "USD")]
    pub currency: String,
    /// Exchange name reported by the provider (`Unknown` when missing).
    #[schema(example = "NMS")]
    pub exchange: String,
    /// When this quote was assembled.
    pub fetched_at_utc: DateTime<Utc>,
}
