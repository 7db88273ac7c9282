use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::{Html, Redirect},
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::{
    core::{Quote, QuoteError},
    quote::normalize_symbol,
    server::{
        error::{ApiResult, ErrorBody},
        state::AppState,
    },
};

pub(crate) const OPENAPI_PATH: &str = "/api-docs/openapi.json";
pub(crate) const SWAGGER_PATH: &str = "/swagger";

/// Swagger UI shell; the assets come from the swagger-ui-dist CDN and the
/// document from [`OPENAPI_PATH`].
const SWAGGER_HTML: &str = include_str!("swagger.html");

/// Liveness payload for `GET /health`.
#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    /// Always `"ok"` while the process is serving.
    #[schema(example = "ok")]
    pub status: String,
}

#[utoipa::path(get, path = "/health", responses((status = 200, description = "Health", body = HealthStatus)))]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".into(),
    })
}

/// Landing page: the interactive API docs.
pub async fn root() -> Redirect {
    Redirect::temporary(SWAGGER_PATH)
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_HTML)
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/api/quote/{ticker}",
    params(("ticker" = String, Path, description = "Ticker symbol, case-insensitive")),
    responses(
        (status = 200, description = "Latest quote", body = Quote),
        (status = 400, description = "Empty or undecodable ticker", body = ErrorBody),
        (status = 404, description = "Unknown ticker or no market price", body = ErrorBody),
        (status = 429, description = "Provider rate limit reached", body = ErrorBody),
        (status = 502, description = "Provider unreachable or answered unexpectedly", body = ErrorBody),
        (status = 504, description = "Provider timed out", body = ErrorBody),
    )
)]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    ticker: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Quote>> {
    let Path(ticker) = ticker?;
    let symbol = normalize_symbol(&ticker)?;

    // Cancelled on shutdown, or when this future is dropped because the client went away.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let quote = state.quote_service.fetch_quote(&symbol, &cancel).await?;
    Ok(Json(quote))
}

/// `/api/quote` and `/api/quote/` carry no ticker at all.
pub async fn missing_ticker() -> ApiResult<Json<Quote>> {
    Err(QuoteError::InvalidSymbol.into())
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_quote),
    components(schemas(Quote, ErrorBody, HealthStatus)),
    tags((name = "ticker-search"))
)]
pub struct ApiDoc;
