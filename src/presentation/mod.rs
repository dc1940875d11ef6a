// Presentation layer - HTTP surface over the core services
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/api/data", get(handlers::get_data))
        .route("/api/view", get(handlers::get_view))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/stream", get(handlers::get_stream))
        .route("/api/control/preset/:preset", post(handlers::set_preset))
        .route("/api/control/stream/:action", post(handlers::control_stream))
        .route("/api/control/viewport/zoom", post(handlers::zoom_viewport))
        .route("/api/control/viewport/pan/:phase", post(handlers::pan_viewport))
        .route("/api/control/viewport/reset", post(handlers::reset_viewport))
        .route("/api/control/category/:category", post(handlers::toggle_category))
        .route("/api/control/period/:period", post(handlers::set_period))
        .route("/api/control/range", post(handlers::set_time_range))
        .route("/api/control/view/reset", post(handlers::reset_view))
        .route("/api/control/resize", post(handlers::resize_charts))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
