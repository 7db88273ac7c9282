use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::core::{Quote, QuoteClient, QuoteError};

/// A source of latest quotes.
///
/// The HTTP layer depends on this trait rather than on [`QuoteClient`] directly,
/// which keeps handlers testable without a provider. It is implemented by
/// [`QuoteClient`].
pub trait QuoteService: Send + Sync {
    /// Fetch the latest quote for `ticker`, aborting promptly once `cancel` fires.
    fn fetch_quote<'a>(
        &'a self,
        ticker: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Quote, QuoteError>>;
}

impl QuoteService for QuoteClient {
    fn fetch_quote<'a>(
        &'a self,
        ticker: &'a str,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Quote, QuoteError>> {
        Box::pin(crate::quote::fetch_quote(self, ticker, cancel))
    }
}
