use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The ticker was empty or whitespace-only after normalization.
    #[error("Ticker is required.")]
    InvalidSymbol,

    /// The provider has no data (or no market price) for the symbol.
    #[error("Ticker '{symbol}' was not found.")]
    NotFound {
        /// The normalized symbol that was looked up.
        symbol: String,
    },

    /// The provider kept answering 429 until the retry budget ran out.
    #[error("rate limited by provider at {url}")]
    RateLimited {
        /// The URL that was throttled.
        url: String,
    },

    /// The request could not be delivered (connection refused, DNS, TLS, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request or body read exceeded the client timeout.
    #[error("request timed out at {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The provider returned an unsuccessful HTTP status that is not handled elsewhere.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The provider's body was not the JSON document we expect.
    #[error("Data format unexpected or missing field: {0}")]
    Malformed(String),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configured chart base URL cannot have path segments appended.
    #[error("base URL cannot be a base: {0}")]
    InvalidBase(String),

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl QuoteError {
    /// Classify a `reqwest` failure, keeping timeouts apart from other transport errors.
    pub(crate) fn from_transport(err: reqwest::Error, url: &url::Url) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Whether the failure is on the provider side rather than in the caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Transport(_)
                | Self::Timeout { .. }
                | Self::Status { .. }
                | Self::Malformed(_)
        )
    }
}
