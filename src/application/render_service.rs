// Render service - per-frame drawing of the live chart bindings
use crate::application::state::DashboardState;
use crate::application::view_service::ViewService;
use crate::domain::chart::{ChartDimensions, ChartKind};
use crate::domain::sample::Sample;
use crate::infrastructure::surface::{ChartFrame, ChartSurface, SurfaceError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;

/// One chart slot on the dashboard: a category slice of the filtered view
/// drawn as a particular kind.
#[derive(Debug, Clone)]
pub struct ChartBinding {
    pub id: &'static str,
    pub category: &'static str,
    pub kind: ChartKind,
    pub color: (u8, u8, u8),
}

/// The four live bindings the dashboard renders each frame.
pub fn default_bindings() -> Vec<ChartBinding> {
    vec![
        ChartBinding {
            id: "line",
            category: "temperature",
            kind: ChartKind::Line,
            color: (239, 68, 68),
        },
        ChartBinding {
            id: "bars",
            category: "pressure",
            kind: ChartKind::Bar,
            color: (59, 130, 246),
        },
        ChartBinding {
            id: "scatter",
            category: "humidity",
            kind: ChartKind::Scatter,
            color: (16, 185, 129),
        },
        ChartBinding {
            id: "heatmap",
            category: "voltage",
            kind: ChartKind::Heatmap,
            color: (139, 92, 246),
        },
    ]
}

pub struct RenderService {
    state: Arc<DashboardState>,
    view: ViewService,
    charts: Mutex<Vec<(ChartBinding, ChartSurface)>>,
    dims: RwLock<ChartDimensions>,
    show_grid: bool,
}

impl RenderService {
    pub fn new(
        state: Arc<DashboardState>,
        view: ViewService,
        bindings: Vec<ChartBinding>,
        width: u32,
        height: u32,
        show_grid: bool,
    ) -> Self {
        let charts = bindings
            .into_iter()
            .map(|binding| (binding, ChartSurface::new(width, height)))
            .collect();
        Self {
            state,
            view,
            charts: Mutex::new(charts),
            dims: RwLock::new(ChartDimensions::new(width as f64, height as f64)),
            show_grid,
        }
    }

    /// Draws every binding from the current filtered view, then pushes the
    /// measured pipeline and render durations and ticks the frame counter.
    pub fn render_frame(&self) -> Result<(), SurfaceError> {
        let pipeline_started = Instant::now();
        let filtered = self.view.filtered_samples();
        let data_elapsed = pipeline_started.elapsed();

        let viewport = self.state.viewport();
        let dims = *self.dims.read();

        let render_started = Instant::now();
        {
            let mut charts = self.charts.lock();
            for (binding, surface) in charts.iter_mut() {
                let slice: Vec<Sample> = filtered
                    .iter()
                    .filter(|s| s.category == binding.category)
                    .cloned()
                    .collect();
                surface.render(&ChartFrame {
                    kind: binding.kind,
                    samples: &slice,
                    dims: &dims,
                    viewport: &viewport,
                    color: binding.color,
                    show_grid: self.show_grid,
                })?;
            }
        }

        self.state.record_data_processing_time(data_elapsed);
        self.state.record_render_time(render_started.elapsed());
        self.state.tick_frame();
        Ok(())
    }

    /// Rescales the backing surfaces and redraws synchronously before
    /// returning, so no frame is ever served at the old resolution.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), SurfaceError> {
        {
            *self.dims.write() = ChartDimensions::new(width as f64, height as f64);
            let mut charts = self.charts.lock();
            for (_, surface) in charts.iter_mut() {
                *surface = ChartSurface::new(width, height);
            }
        }
        self.render_frame()
    }

    pub fn dimensions(&self) -> ChartDimensions {
        *self.dims.read()
    }

    /// RGB pixels of one chart's last frame, for callers that serve or
    /// inspect rendered output.
    pub fn chart_pixels(&self, id: &str) -> Option<Vec<u8>> {
        let charts = self.charts.lock();
        charts
            .iter()
            .find(|(binding, _)| binding.id == id)
            .map(|(_, surface)| surface.pixels().to_vec())
    }
}
