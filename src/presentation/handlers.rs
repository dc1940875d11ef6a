// HTTP request handlers
use crate::application::sample_source::clamp_initial_count;
use crate::application::state::{Preset, ViewSelection};
use crate::domain::chart::ChartDimensions;
use crate::domain::sample::{AggregationPeriod, TimeRange, CATEGORIES};
use crate::domain::viewport::Viewport;
use crate::infrastructure::json_lines::stream_from_subscription;
use crate::infrastructure::surface::SurfaceError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Client errors at the query boundary. None of these touch core state.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid type: {0}")]
    InvalidType(String),
    #[error("type=new requires lastTimestamp")]
    MissingLastTimestamp,
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("unknown stream action: {0}")]
    UnknownAction(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("pan requires x and y")]
    MissingCoordinates,
    #[error("time range requires both start and end")]
    IncompleteRange,
    #[error("chart dimensions must be non-zero")]
    InvalidDimensions,
    #[error("sample generation failed")]
    Generation(#[source] anyhow::Error),
    #[error("chart resize failed")]
    Resize(#[source] SurfaceError),
}

impl QueryError {
    fn status(&self) -> StatusCode {
        match self {
            QueryError::Generation(_) | QueryError::Resize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        match &self {
            QueryError::Generation(err) => tracing::warn!("data endpoint failed: {err}"),
            QueryError::Resize(err) => tracing::warn!("chart resize failed: {err}"),
            _ => {}
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub count: Option<usize>,
    pub last_timestamp: Option<i64>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomQuery {
    pub delta: f64,
    pub center_x: f64,
    pub center_y: f64,
}

#[derive(Deserialize)]
pub struct PanQuery {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Deserialize)]
pub struct ResizeQuery {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    /// Comma-separated category labels; absent or empty selects all.
    pub categories: Option<String>,
    pub period: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub scroll_top: Option<f64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The query-style data endpoint: `type=initial&count=N` for a seed dataset,
/// `type=new&lastTimestamp=T[&category=C]` for one successor sample.
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<serde_json::Value>, QueryError> {
    match query.kind.as_deref().unwrap_or("initial") {
        "initial" => {
            let count = clamp_initial_count(query.count.unwrap_or(state.initial_count));
            let samples = state
                .source
                .initial(count)
                .await
                .map_err(QueryError::Generation)?;
            Ok(Json(json!({ "data": samples })))
        }
        "new" => {
            let last_timestamp = query
                .last_timestamp
                .ok_or(QueryError::MissingLastTimestamp)?;
            let sample = state
                .source
                .next(last_timestamp, query.category.as_deref())
                .await
                .map_err(QueryError::Generation)?;
            Ok(Json(json!({ "data": sample })))
        }
        other => Err(QueryError::InvalidType(other.to_string())),
    }
}

/// The filtered view over the live buffer: category filter, then time-range
/// filter, then aggregation, plus table window metadata at `scrollTop`.
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, QueryError> {
    let period = match query.period.as_deref() {
        None => AggregationPeriod::OneMinute,
        Some(raw) => AggregationPeriod::parse(raw)
            .ok_or_else(|| QueryError::InvalidPeriod(raw.to_string()))?,
    };
    let categories: Vec<String> = query
        .categories
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    let time_range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(TimeRange { start, end }),
        _ => None,
    };

    let selection = ViewSelection {
        categories,
        period,
        time_range,
    };
    let view = state
        .view_service
        .view_for(&selection, query.scroll_top.unwrap_or(0.0));
    Ok(Json(view).into_response())
}

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.metrics_snapshot())
}

/// Chunked NDJSON of live samples as ingestion appends them; ends when the
/// client disconnects or the session stops.
pub async fn get_stream(State(state): State<Arc<AppState>>) -> Response {
    stream_from_subscription(state.dashboard.subscribe_live())
}

/// Switch the operating preset; takes effect on the next ingestion tick.
pub async fn set_preset(
    State(state): State<Arc<AppState>>,
    Path(preset): Path<String>,
) -> Result<Json<serde_json::Value>, QueryError> {
    let preset = Preset::parse(&preset).ok_or_else(|| QueryError::UnknownPreset(preset.clone()))?;
    state.dashboard.set_preset(preset);
    Ok(Json(json!({ "preset": preset.as_str() })))
}

/// Start or stop the ingestion session.
pub async fn control_stream(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
) -> Result<Json<serde_json::Value>, QueryError> {
    match action.as_str() {
        "start" => {
            state.stream_service.start();
        }
        "stop" => {
            state.stream_service.stop();
        }
        other => return Err(QueryError::UnknownAction(other.to_string())),
    }
    Ok(Json(
        json!({ "streaming": state.stream_service.is_running() }),
    ))
}

/// Zoom the shared viewport about a screen point; the render loop picks the
/// new transform up on its next frame.
pub async fn zoom_viewport(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ZoomQuery>,
) -> Json<Viewport> {
    Json(state.dashboard.with_viewport_mut(|viewport| {
        viewport.zoom(query.delta, query.center_x, query.center_y);
        viewport.clone()
    }))
}

/// One phase of a pan gesture: `start` and `move` carry the pointer position,
/// `end` releases the drag.
pub async fn pan_viewport(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Query(query): Query<PanQuery>,
) -> Result<Json<Viewport>, QueryError> {
    match phase.as_str() {
        "start" | "move" => {
            let (x, y) = match (query.x, query.y) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(QueryError::MissingCoordinates),
            };
            state.dashboard.with_viewport_mut(|viewport| {
                if phase == "start" {
                    viewport.pan_start(x, y);
                } else {
                    viewport.pan_move(x, y);
                }
            });
        }
        "end" => state.dashboard.with_viewport_mut(|viewport| viewport.pan_end()),
        other => return Err(QueryError::UnknownAction(other.to_string())),
    }
    Ok(Json(state.dashboard.viewport()))
}

pub async fn reset_viewport(State(state): State<Arc<AppState>>) -> Json<Viewport> {
    Json(state.dashboard.with_viewport_mut(|viewport| {
        viewport.reset();
        viewport.clone()
    }))
}

/// Toggle one category in or out of the stored selection.
pub async fn toggle_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<ViewSelection>, QueryError> {
    if !CATEGORIES.contains(&category.as_str()) {
        return Err(QueryError::UnknownCategory(category));
    }
    state.dashboard.toggle_category(&category);
    Ok(Json(state.dashboard.selection()))
}

pub async fn set_period(
    State(state): State<Arc<AppState>>,
    Path(period): Path<String>,
) -> Result<Json<ViewSelection>, QueryError> {
    let parsed = AggregationPeriod::parse(&period)
        .ok_or_else(|| QueryError::InvalidPeriod(period.clone()))?;
    state.dashboard.set_period(parsed);
    Ok(Json(state.dashboard.selection()))
}

/// Set the stored time range (both bounds) or clear it (neither bound).
pub async fn set_time_range(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ViewSelection>, QueryError> {
    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(TimeRange { start, end }),
        (None, None) => None,
        _ => return Err(QueryError::IncompleteRange),
    };
    state.dashboard.set_time_range(range);
    Ok(Json(state.dashboard.selection()))
}

pub async fn reset_view(State(state): State<Arc<AppState>>) -> Json<ViewSelection> {
    state.dashboard.reset_view();
    Json(state.dashboard.selection())
}

/// Rescale every chart surface and redraw synchronously before responding.
pub async fn resize_charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResizeQuery>,
) -> Result<Json<ChartDimensions>, QueryError> {
    if query.width == 0 || query.height == 0 {
        return Err(QueryError::InvalidDimensions);
    }
    state
        .renderer
        .resize(query.width, query.height)
        .map_err(QueryError::Resize)?;
    Ok(Json(state.renderer.dimensions()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render_service::{default_bindings, RenderService};
    use crate::application::sample_source::SampleSource;
    use crate::application::state::DashboardState;
    use crate::application::stream_service::StreamService;
    use crate::application::view_service::ViewService;
    use crate::domain::sample::Sample;
    use crate::domain::table::WindowOptions;
    use crate::infrastructure::generator::SyntheticSampleGenerator;
    use crate::presentation::router;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn test_state() -> Arc<AppState> {
        let source = Arc::new(SyntheticSampleGenerator::new());
        let initial = source.initial(600).await.unwrap();
        let dashboard = Arc::new(DashboardState::new(initial, Preset::Normal));
        let view_service = ViewService::new(dashboard.clone(), WindowOptions::default());
        let renderer = Arc::new(RenderService::new(
            dashboard.clone(),
            view_service.clone(),
            default_bindings(),
            200,
            100,
            false,
        ));
        let stream_service = Arc::new(StreamService::new(
            dashboard.clone(),
            source.clone(),
            renderer.clone(),
            30,
        ));
        Arc::new(AppState {
            dashboard,
            view_service,
            stream_service,
            renderer,
            source,
            initial_count: 1000,
        })
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    async fn post(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = router(test_state().await)
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_data_initial_returns_requested_count() {
        let (status, body) = get(test_state().await, "/api/data?type=initial&count=512").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 512);
    }

    #[tokio::test]
    async fn test_data_initial_count_is_clamped() {
        let (status, body) = get(test_state().await, "/api/data?type=initial&count=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 500);
    }

    #[tokio::test]
    async fn test_data_new_advances_timestamp() {
        let (status, body) = get(
            test_state().await,
            "/api/data?type=new&lastTimestamp=5000&category=voltage",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let sample: Sample = serde_json::from_value(body["data"].clone()).unwrap();
        assert_eq!(sample.timestamp, 5_100);
        assert_eq!(sample.category, "voltage");
    }

    #[tokio::test]
    async fn test_data_new_without_last_timestamp_is_client_error() {
        let (status, body) = get(test_state().await, "/api/data?type=new").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_data_invalid_type_leaves_state_untouched() {
        let state = test_state().await;
        let before = state.dashboard.buffer_len();
        let (status, body) = get(state.clone(), "/api/data?type=replay").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("replay"));
        assert_eq!(state.dashboard.buffer_len(), before);
    }

    #[tokio::test]
    async fn test_view_aggregates_when_period_selected() {
        let (status, body) = get(
            test_state().await,
            "/api/view?categories=temperature&period=5min",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let samples = body["samples"].as_array().unwrap();
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s["metadata"]["aggregated"] == true));
        assert!(samples.iter().all(|s| s["category"] == "temperature"));
    }

    #[tokio::test]
    async fn test_view_default_is_raw_with_window_metadata() {
        let (status, body) = get(test_state().await, "/api/view").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRows"], 600);
        assert_eq!(body["window"]["startIndex"], 0);
        assert_eq!(body["window"]["totalHeight"], 600 * 40);
        // Rows are the visible slice, not the whole table
        assert!(body["rows"].as_array().unwrap().len() <= 16);
    }

    #[tokio::test]
    async fn test_view_invalid_period_is_client_error() {
        let (status, _) = get(test_state().await, "/api/view?period=2min").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_defaults() {
        let (status, body) = get(test_state().await, "/api/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fps"], 60);
        assert_eq!(body["renderTimeMs"], 0.0);
    }

    #[tokio::test]
    async fn test_preset_switch_and_rejection() {
        let state = test_state().await;
        let (status, body) = post(state.clone(), "/api/control/preset/stress").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preset"], "stress");
        assert_eq!(state.dashboard.preset(), Preset::Stress);

        let (status, _) = post(state, "/api/control/preset/turbo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_viewport_zoom_and_reset() {
        let state = test_state().await;
        let (status, body) = post(
            state.clone(),
            "/api/control/viewport/zoom?delta=0.5&centerX=100&centerY=50",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scale"], 1.5);
        // offset' = center - (center - offset) * factor
        assert_eq!(body["offsetX"], -50.0);
        assert_eq!(state.dashboard.viewport().scale, 1.5);

        let (status, body) = post(state, "/api/control/viewport/reset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scale"], 1.0);
        assert_eq!(body["offsetX"], 0.0);
    }

    #[tokio::test]
    async fn test_viewport_pan_gesture() {
        let state = test_state().await;
        post(state.clone(), "/api/control/viewport/pan/start?x=10&y=10").await;
        let (status, body) = post(state.clone(), "/api/control/viewport/pan/move?x=25&y=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offsetX"], 15.0);
        assert_eq!(body["offsetY"], -6.0);
        post(state.clone(), "/api/control/viewport/pan/end").await;

        // Moves after the drag ends do nothing
        post(state.clone(), "/api/control/viewport/pan/move?x=99&y=99").await;
        assert_eq!(state.dashboard.viewport().offset_x, 15.0);

        let (status, _) = post(state.clone(), "/api/control/viewport/pan/start").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = post(state, "/api/control/viewport/pan/fling?x=1&y=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_selection_controls_drive_the_stored_view() {
        let state = test_state().await;
        let (status, body) = post(state.clone(), "/api/control/category/voltage").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"][0], "voltage");
        let (status, _) = post(state.clone(), "/api/control/category/plasma").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(state.clone(), "/api/control/period/1hour").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "1hour");

        let (status, _) = post(state.clone(), "/api/control/range?start=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = post(state.clone(), "/api/control/range?start=5&end=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timeRange"]["start"], 5);

        // The stored selection is what the render loop consumes
        assert_eq!(state.dashboard.selection().categories, vec!["voltage"]);
        assert_eq!(
            state.dashboard.selection().period,
            AggregationPeriod::OneHour
        );

        let (status, body) = post(state, "/api/control/view/reset").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["categories"].as_array().unwrap().is_empty());
        assert!(body["timeRange"].is_null());
    }

    #[tokio::test]
    async fn test_resize_applies_to_surfaces() {
        let state = test_state().await;
        let (status, body) = post(state.clone(), "/api/control/resize?width=320&height=160").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["width"], 320.0);
        assert_eq!(
            state.renderer.chart_pixels("line").unwrap().len(),
            320 * 160 * 3
        );

        let (status, _) = post(state, "/api/control/resize?width=0&height=160").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stream_control_round_trip() {
        let state = test_state().await;
        let (status, body) = post(state.clone(), "/api/control/stream/start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["streaming"], true);

        let (status, body) = post(state.clone(), "/api/control/stream/stop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["streaming"], false);

        let (status, _) = post(state, "/api/control/stream/pause").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
