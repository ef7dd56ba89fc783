use axum::{extract::Path, http::StatusCode};

use super::AppError;

// ─── GET / ───────────────────────────────────────────────────────

pub async fn hello() -> &'static str {
    "hello world\n"
}

// ─── GET /status/:code ───────────────────────────────────────────
/// Answers with whatever status the path asks for. Handy for driving
/// the per-status counters from curl.

pub async fn echo_status(Path(code): Path<u16>) -> Result<StatusCode, AppError> {
    StatusCode::from_u16(code).map_err(|_| {
        AppError::BadRequest(format!("{code} is not a valid HTTP status"))
    })
}
