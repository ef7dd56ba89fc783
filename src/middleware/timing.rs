use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::Metrics;

/// Axum middleware that feeds every wrapped request into `Metrics`.
///
/// Install with `axum::middleware::from_fn_with_state(metrics, track_metrics)`.
/// The status is read from the finished response, so whatever the handler
/// (or an inner rejection) settled on is what gets counted; a handler that
/// never sets one yields 200.
///
/// Also adds two response headers:
///
///   X-Response-Time-Us  — total handler wall time in microseconds
///   Server-Timing       — same value in the standard Server-Timing format
pub async fn track_metrics(
    State(metrics): State<Arc<Metrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    let status = response.status().as_u16();
    metrics.record_duration(status, elapsed);

    // ── Inject response headers ─────────────────────────────────
    let us = elapsed.as_micros();
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("x-response-time-us", val);
    }

    let server_timing =
        format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(val) = server_timing.parse() {
        response.headers_mut().insert("server-timing", val);
    }

    tracing::trace!(%method, %path, status, us = us as u64, "request measured");

    response
}
