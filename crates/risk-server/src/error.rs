use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use booster::BoosterError;
use features::ValidationError;
use protocol::ErrorResponse;

/// Everything that can go wrong while serving `/predict`.
///
/// The variants exist for logging; clients always get a 400 carrying the
/// error text.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("invalid JSON body: {0}")]
    Body(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] BoosterError),
}

impl ApiError {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ApiError::Body(_) => "body",
            ApiError::Validation(_) => "validation",
            ApiError::Scoring(_) => "scoring",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.to_string());
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
