// Application state for HTTP handlers
use crate::application::render_service::RenderService;
use crate::application::sample_source::SampleSource;
use crate::application::state::DashboardState;
use crate::application::stream_service::StreamService;
use crate::application::view_service::ViewService;
use std::sync::Arc;

pub struct AppState {
    pub dashboard: Arc<DashboardState>,
    pub view_service: ViewService,
    pub stream_service: Arc<StreamService>,
    pub renderer: Arc<RenderService>,
    pub source: Arc<dyn SampleSource>,
    pub initial_count: usize,
}
