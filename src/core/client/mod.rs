//! Public client surface + builder.
//! Internals are split into `constants` (UA + defaults) and `retry` (rate-limit policy).

mod constants;
/// Retry policy types (`RetryConfig`, `Backoff`).
pub mod retry;

pub use constants::CHART_PATH;
pub use retry::{Backoff, RetryConfig};

use crate::core::QuoteError;
use constants::{DEFAULT_BASE_CHART, USER_AGENT};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Thin wrapper around a pooled `reqwest::Client`, the chart base URL and the retry policy.
///
/// Cloning is cheap: clones share the same connection pool, so one client is
/// built at startup and handed to every request.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: Client,
    base_chart: Url,
    retry: RetryConfig,
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl QuoteClient {
    /// Create a new builder.
    pub fn builder() -> QuoteClientBuilder {
        QuoteClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn base_chart(&self) -> &Url {
        &self.base_chart
    }

    /// The retry policy this client applies to rate-limited responses.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Send a GET to `url`, retrying while the provider answers with a retryable status.
    ///
    /// Returns the last response once it is not retryable or the attempt budget
    /// is spent; status interpretation is left to the caller. The token is
    /// checked before each attempt and raced against both the request and the
    /// backoff sleep, so nothing new starts after cancellation.
    pub(crate) async fn send_with_retry(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Response, QuoteError> {
        let budget = self.retry.attempt_budget();
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(QuoteError::Cancelled);
            }

            tracing::debug!(attempt, %url, "sending chart request");
            let req = self
                .http
                .get(url.clone())
                .header(ACCEPT, "application/json");

            let resp = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QuoteError::Cancelled),
                r = req.send() => r.map_err(|e| QuoteError::from_transport(e, url))?,
            };

            let status = resp.status().as_u16();
            if !self.retry.should_retry(status) || attempt >= budget {
                return Ok(resp);
            }

            let delay = self.retry.backoff.delay_for(attempt);
            tracing::warn!(attempt, status, ?delay, %url, "retryable status from provider, backing off");
            drop(resp);

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QuoteError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct QuoteClientBuilder {
    user_agent: Option<String>,
    base_chart: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl QuoteClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the chart API base (e.g., `https://query1.finance.yahoo.com/v8/finance/chart/`).
    #[must_use]
    pub fn base_chart(mut self, url: Url) -> Self {
        self.base_chart = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Replace the rate-limit retry policy.
    #[must_use]
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Convenience toggle for the retry loop, keeping the rest of the policy.
    #[must_use]
    pub fn retry_enabled(mut self, enabled: bool) -> Self {
        let mut cfg = self.retry.take().unwrap_or_default();
        cfg.enabled = enabled;
        self.retry = Some(cfg);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be used as a base or if the
    /// underlying HTTP client fails to build.
    pub fn build(self) -> Result<QuoteClient, QuoteError> {
        let base_chart = match self.base_chart {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_CHART)?,
        };
        if base_chart.cannot_be_a_base() {
            return Err(QuoteError::InvalidBase(base_chart.to_string()));
        }

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build().map_err(QuoteError::Transport)?;

        Ok(QuoteClient {
            http,
            base_chart,
            retry: self.retry.unwrap_or_default(),
        })
    }
}
