//! ticker-search: look up the latest market price for a ticker symbol.
//!
//! The crate has two layers:
//! - a provider client ([`QuoteClient`], [`fetch_quote`]) that calls the Yahoo
//!   Finance chart v8 endpoint, retries while rate limited and extracts a [`Quote`];
//! - an HTTP surface ([`server::app_router`]) exposing `GET /api/quote/{ticker}`.
//!
//! ```no_run
//! # use ticker_search::{QuoteClient, fetch_quote};
//! # use tokio_util::sync::CancellationToken;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QuoteClient::builder()
//!     .timeout(std::time::Duration::from_secs(10))
//!     .build()?;
//! let quote = fetch_quote(&client, " aapl ", &CancellationToken::new()).await?;
//! println!("{} {} {} on {}", quote.ticker, quote.currency, quote.price, quote.exchange);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod quote;
pub mod server;

pub use crate::core::client::{Backoff, RetryConfig};
pub use crate::core::{Quote, QuoteClient, QuoteClientBuilder, QuoteError, QuoteService};
pub use crate::quote::{fetch_quote, normalize_symbol};
