// Shared dashboard state with named read/write entry points
use crate::domain::buffer::StreamBuffer;
use crate::domain::metrics::{MemoryReading, PerformanceMetrics, PerformanceMonitor};
use crate::domain::sample::{AggregationPeriod, Sample, TimeRange};
use crate::domain::viewport::Viewport;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

/// Named (ingestion interval, buffer capacity) pair. Switching presets takes
/// effect on the next ingestion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Normal,
    Stress,
}

impl Preset {
    pub fn ingest_interval(&self) -> Duration {
        match self {
            Preset::Normal => Duration::from_millis(100),
            Preset::Stress => Duration::from_millis(50),
        }
    }

    pub fn buffer_capacity(&self) -> usize {
        match self {
            Preset::Normal => 10_000,
            Preset::Stress => 50_000,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Preset::Normal),
            "stress" => Some(Preset::Stress),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Normal => "normal",
            Preset::Stress => "stress",
        }
    }
}

/// Externally controlled filter inputs: category set, aggregation period and
/// optional time range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSelection {
    pub categories: Vec<String>,
    pub period: AggregationPeriod,
    pub time_range: Option<TimeRange>,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            period: AggregationPeriod::OneMinute,
            time_range: None,
        }
    }
}

impl ViewSelection {
    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category.to_string());
        }
    }
}

/// The single owned state object shared by the ingestion, render and metrics
/// loops plus the HTTP handlers. All mutation goes through the entry points
/// below; locks are held only for the mutation itself.
pub struct DashboardState {
    buffer: RwLock<StreamBuffer>,
    viewport: RwLock<Viewport>,
    selection: RwLock<ViewSelection>,
    monitor: RwLock<PerformanceMonitor>,
    preset: RwLock<Preset>,
    live: broadcast::Sender<Sample>,
}

impl DashboardState {
    pub fn new(initial: Vec<Sample>, preset: Preset) -> Self {
        let (live, _) = broadcast::channel(1024);
        Self {
            buffer: RwLock::new(StreamBuffer::with_initial(initial, preset.buffer_capacity())),
            viewport: RwLock::new(Viewport::new()),
            selection: RwLock::new(ViewSelection::default()),
            monitor: RwLock::new(PerformanceMonitor::new()),
            preset: RwLock::new(preset),
            live,
        }
    }

    /// Appends one ingested sample, applying the current preset's capacity,
    /// and fans it out to live stream subscribers.
    pub fn append_live(&self, sample: Sample) {
        let capacity = self.preset.read().buffer_capacity();
        {
            let mut buffer = self.buffer.write();
            buffer.set_capacity(capacity);
            buffer.append(sample.clone());
        }
        // No subscribers is fine; the send just drops the sample.
        let _ = self.live.send(sample);
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.buffer.read().snapshot()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.buffer.read().last_timestamp()
    }

    pub fn subscribe_live(&self) -> broadcast::Receiver<Sample> {
        self.live.subscribe()
    }

    pub fn preset(&self) -> Preset {
        *self.preset.read()
    }

    pub fn set_preset(&self, preset: Preset) {
        *self.preset.write() = preset;
        tracing::info!(preset = preset.as_str(), "operating preset switched");
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.read().clone()
    }

    pub fn with_viewport_mut<R>(&self, f: impl FnOnce(&mut Viewport) -> R) -> R {
        f(&mut self.viewport.write())
    }

    pub fn selection(&self) -> ViewSelection {
        self.selection.read().clone()
    }

    pub fn toggle_category(&self, category: &str) {
        self.selection.write().toggle_category(category);
    }

    pub fn set_period(&self, period: AggregationPeriod) {
        self.selection.write().period = period;
    }

    pub fn set_time_range(&self, range: Option<TimeRange>) {
        self.selection.write().time_range = range;
    }

    /// Restores the default view selection: all categories, raw period, no
    /// time range.
    pub fn reset_view(&self) {
        *self.selection.write() = ViewSelection::default();
    }

    pub fn tick_frame(&self) {
        self.monitor.write().tick_frame();
    }

    pub fn record_render_time(&self, duration: Duration) {
        self.monitor.write().record_render_time(duration);
    }

    pub fn record_data_processing_time(&self, duration: Duration) {
        self.monitor.write().record_data_processing_time(duration);
    }

    pub fn record_memory(&self, reading: MemoryReading) {
        self.monitor.write().record_memory(reading);
    }

    pub fn metrics_snapshot(&self) -> PerformanceMetrics {
        self.monitor.read().snapshot()
    }
}
