use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::percentiles::Data;
use crate::handlers::AppError;
use crate::AppState;

// ─── GET /stats ──────────────────────────────────────────────────
/// Returns a single JSON snapshot. A failed aggregation is a 500, never
/// a partially filled document.

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Data>, AppError> {
    let data = state.metrics.snapshot()?;
    Ok(Json(data))
}

// ─── GET /stats/stream ───────────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full `Data` snapshot as JSON once per configured interval.
/// Ticks whose snapshot fails send an `error` event instead.

pub async fn stats_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(state.stream_interval);

    let stream = IntervalStream::new(interval).map(move |_| {
        let event = match state.metrics.snapshot() {
            Ok(data) => {
                let json = serde_json::to_string(&data).unwrap_or_default();
                Event::default().data(json)
            }
            Err(e) => Event::default().event("error").data(e.to_string()),
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
