//! HTTP surface: the quote endpoint, health check and API document.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use config::{Config, ConfigError, LogFormat};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, build_state, init_tracing};

use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the full application: API routes, the optional static UI fallback
/// (`TS_STATIC_DIR`), and the CORS / request-id / trace middleware over all of it.
pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_allow.clone()))
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route(api::SWAGGER_PATH, get(api::swagger_ui))
        .route(api::OPENAPI_PATH, get(api::openapi))
        .route("/api/quote", get(api::missing_ticker))
        .route("/api/quote/", get(api::missing_ticker))
        .route("/api/quote/{ticker}", get(api::get_quote))
        .with_state(state);

    if let Some(static_dir) = &config.static_dir {
        // Unknown paths fall back to index.html so client-side routes still load.
        let index_file = static_dir.join("index.html");
        router = router.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index_file)));
        tracing::info!("Serving UI from {}", static_dir.display());
    }

    router
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
