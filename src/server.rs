use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::metrics::stream;
use crate::middleware::timing;
use crate::AppState;

/// Builds the demo `Router`: measured routes plus the stats endpoints.
///
/// Only the routes in the measured group go through `track_metrics`; the
/// stats endpoints are left out so polling them does not skew the numbers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let measured = Router::new()
        // ── Measured endpoints ──────────────────────────────────
        .route("/", get(handlers::demo::hello))
        .route("/status/:code", get(handlers::demo::echo_status))
        .route_layer(axum_mw::from_fn_with_state(
            state.metrics.clone(),
            timing::track_metrics,
        ));

    Router::new()
        // ── Stats ───────────────────────────────────────────────
        .route("/stats", get(stream::get_stats))
        .route("/stats/stream", get(stream::stats_stream))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        .merge(measured)
        // ── Global middleware ───────────────────────────────────
        .layer(CorsLayer::permissive())
}
