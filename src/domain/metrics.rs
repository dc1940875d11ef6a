// Frame-rate and timing instrumentation
use serde::Serialize;
use std::time::{Duration, Instant};

/// Rolling frames-per-second meter. `tick` is called once per render-loop
/// pass; the rate is recomputed whenever at least one second has elapsed
/// since the last reset. Reports 60 until the first full window completes.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    frame_count: u32,
    window_start: Instant,
    fps: u32,
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRateMeter {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            window_start: Instant::now(),
            fps: 60,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frame_count += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= Duration::from_millis(1000) {
            let elapsed_ms = elapsed.as_millis().max(1) as f64;
            self.fps = (self.frame_count as f64 * 1000.0 / elapsed_ms).round() as u32;
            self.frame_count = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.window_start = Instant::now();
        self.fps = 60;
    }
}

/// One host memory measurement. `Unavailable` is distinct from zero: zero is
/// a valid reading, absence of the capability is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryReading {
    Mebibytes(u64),
    Unavailable,
}

impl MemoryReading {
    pub fn as_mib(&self) -> Option<u64> {
        match self {
            MemoryReading::Mebibytes(mib) => Some(*mib),
            MemoryReading::Unavailable => None,
        }
    }
}

/// Snapshot of the monitor's current readings. Render and data-processing
/// durations are pushed by the render loop, not measured here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub fps: u32,
    /// Whole mebibytes, or null when the host provides no memory statistic.
    pub memory_usage_mib: Option<u64>,
    pub render_time_ms: f64,
    pub data_processing_time_ms: f64,
}

/// Owns the frame meter plus the externally pushed timing samples.
#[derive(Debug)]
pub struct PerformanceMonitor {
    meter: FrameRateMeter,
    memory: MemoryReading,
    render_time_ms: f64,
    data_processing_time_ms: f64,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            meter: FrameRateMeter::new(),
            memory: MemoryReading::Unavailable,
            render_time_ms: 0.0,
            data_processing_time_ms: 0.0,
        }
    }

    pub fn tick_frame(&mut self) {
        self.meter.tick();
    }

    pub fn record_render_time(&mut self, duration: Duration) {
        self.render_time_ms = duration.as_secs_f64() * 1000.0;
    }

    pub fn record_data_processing_time(&mut self, duration: Duration) {
        self.data_processing_time_ms = duration.as_secs_f64() * 1000.0;
    }

    pub fn record_memory(&mut self, reading: MemoryReading) {
        self.memory = reading;
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            fps: self.meter.fps(),
            memory_usage_mib: self.memory.as_mib(),
            render_time_ms: self.render_time_ms,
            data_processing_time_ms: self.data_processing_time_ms,
        }
    }
}
