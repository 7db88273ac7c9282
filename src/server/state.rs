use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    core::{QuoteClient, QuoteError, QuoteService},
    server::config::{Config, LogFormat},
};

/// Shared by every handler through `State<Arc<AppState>>`.
pub struct AppState {
    pub quote_service: Arc<dyn QuoteService>,
    /// Root token; every request works on a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(quote_service: Arc<dyn QuoteService>, shutdown: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            quote_service,
            shutdown,
        })
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Build the shared provider client once; its connection pool lives as long as the process.
pub fn build_state(config: &Config, shutdown: CancellationToken) -> Result<Arc<AppState>, QuoteError> {
    let mut builder = QuoteClient::builder()
        .base_chart(config.chart_base()?)
        .timeout(config.upstream_timeout);
    if let Some(ct) = config.upstream_connect_timeout {
        builder = builder.connect_timeout(ct);
    }
    let client = builder.build()?;
    tracing::info!(base = %client.base_chart(), "market data provider configured");

    Ok(AppState::new(Arc::new(client), shutdown))
}
