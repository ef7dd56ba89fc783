pub mod demo;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AggregationError;

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Aggregation(AggregationError),
}

impl From<AggregationError> for AppError {
    fn from(e: AggregationError) -> Self {
        Self::Aggregation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Aggregation(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("stats: {e}"))
            }
        };

        let body = serde_json::json!({
            "error":  message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
