use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::QuoteError;

/// Every handler failure; rendered as a JSON [`ErrorBody`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    /// The ticker segment could not be decoded (e.g. invalid UTF-8 after percent-decoding).
    #[error("undecodable ticker path: {0}")]
    Path(#[from] PathRejection),
}

/// Body of every failure response; the UI shows `error` verbatim.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Ticker 'NOPE' was not found.")]
    pub error: String,
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Path(_) => (StatusCode::BAD_REQUEST, "Ticker is not valid.".into()),
            ApiError::Quote(e) => match e {
                QuoteError::InvalidSymbol => (StatusCode::BAD_REQUEST, e.to_string()),
                QuoteError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
                QuoteError::RateLimited { .. } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Market data provider rate limit reached. Please retry shortly.".into(),
                ),
                QuoteError::Transport(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Failed to reach market data provider.".into(),
                ),
                QuoteError::Status { status, .. } => (
                    StatusCode::BAD_GATEWAY,
                    format!("Market data provider responded with status {status}."),
                ),
                QuoteError::Malformed(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Unexpected response from market data provider.".into(),
                ),
                QuoteError::Timeout { .. } => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "Request to market data provider timed out.".into(),
                ),
                QuoteError::Cancelled => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Request was cancelled.".into(),
                ),
                QuoteError::Url(_) | QuoteError::InvalidBase(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Market data provider is misconfigured.".into(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        if status.is_server_error() {
            tracing::warn!(%status, cause = %self, "quote request failed");
        } else if let ApiError::Path(_) = &self {
            tracing::debug!(cause = %self, "rejected ticker path");
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
