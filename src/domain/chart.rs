// Chart geometry - pixel mapping for the four chart kinds
use crate::domain::sample::Sample;
use serde::{Deserialize, Serialize};

pub const GRID_TICKS: usize = 10;
pub const HEATMAP_TIME_BUCKETS: usize = 20;
pub const HEATMAP_VALUE_BUCKETS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Purely geometric chart rectangle; recomputed per render, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding {
                top: 20.0,
                right: 20.0,
                bottom: 40.0,
                left: 60.0,
            },
        }
    }

    pub fn drawable_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn drawable_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    pub fn drawable_right(&self) -> f64 {
        self.width - self.padding.right
    }

    pub fn drawable_bottom(&self) -> f64 {
        self.height - self.padding.bottom
    }
}

/// One sample mapped into pixel space. Recomputed every frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default)]
pub struct RenderData {
    pub points: Vec<RenderPoint>,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Linear interpolation of `value` from `[min, max]` into `[out_min, out_max]`.
/// A degenerate input range returns `out_min` instead of dividing by zero.
pub fn scale_value(value: f64, min: f64, max: f64, out_min: f64, out_max: f64) -> f64 {
    if max == min {
        return out_min;
    }
    let ratio = (value - min) / (max - min);
    out_min + ratio * (out_max - out_min)
}

/// Maps samples into the padded drawable rectangle. The value range is padded
/// by 10% on each side so points never touch the chart edge.
pub fn prepare_render_data(samples: &[Sample], dims: &ChartDimensions) -> RenderData {
    if samples.is_empty() {
        return RenderData::default();
    }

    let min_x = samples.iter().map(|s| s.timestamp).min().unwrap_or(0) as f64;
    let max_x = samples.iter().map(|s| s.timestamp).max().unwrap_or(0) as f64;
    let min_y = samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
    let max_y = samples
        .iter()
        .map(|s| s.value)
        .fold(f64::NEG_INFINITY, f64::max);

    let y_padding = (max_y - min_y) * 0.1;
    let padded_min_y = min_y - y_padding;
    let padded_max_y = max_y + y_padding;

    let points = samples
        .iter()
        .map(|s| RenderPoint {
            x: scale_value(
                s.timestamp as f64,
                min_x,
                max_x,
                dims.padding.left,
                dims.drawable_right(),
            ),
            y: scale_value(
                s.value,
                padded_min_y,
                padded_max_y,
                dims.padding.top,
                dims.drawable_bottom(),
            ),
            value: s.value,
            timestamp: s.timestamp,
        })
        .collect();

    RenderData {
        points,
        min_x,
        max_x,
        min_y: padded_min_y,
        max_y: padded_max_y,
    }
}

/// Reference grid segments spanning the drawable rectangle, as
/// `(start, end)` pixel pairs.
pub fn grid_lines(dims: &ChartDimensions) -> Vec<((f64, f64), (f64, f64))> {
    let mut lines = Vec::with_capacity((GRID_TICKS + 1) * 2);
    for i in 0..=GRID_TICKS {
        let x = dims.padding.left + dims.drawable_width() / GRID_TICKS as f64 * i as f64;
        lines.push(((x, dims.padding.top), (x, dims.drawable_bottom())));
    }
    for i in 0..=GRID_TICKS {
        let y = dims.padding.top + dims.drawable_height() / GRID_TICKS as f64 * i as f64;
        lines.push(((dims.padding.left, y), (dims.drawable_right(), y)));
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bar geometry: each point owns `drawable_width / count` of slot width, the
/// bar fills 80% of its slot centered on the point and drops to the drawable
/// bottom.
pub fn bar_rects(render: &RenderData, dims: &ChartDimensions) -> Vec<BarRect> {
    if render.points.is_empty() {
        return Vec::new();
    }
    let slot_width = dims.drawable_width() / render.points.len() as f64;
    let bar_width = slot_width * 0.8;
    render
        .points
        .iter()
        .map(|p| BarRect {
            x: p.x - bar_width / 2.0,
            y: p.y,
            width: bar_width,
            height: dims.drawable_bottom() - p.y,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Mean-value intensity in `[0, 1]` against the global value range.
    pub intensity: f64,
    /// Hue in degrees: 240 (blue) at low intensity down to 0 (red) at high.
    pub hue: f64,
}

/// Heatmap binning: 20 contiguous index-range time buckets, each rendered as
/// one colored cell at the vertical slot matching its mean value.
pub fn heatmap_cells(samples: &[Sample], dims: &ChartDimensions) -> Vec<HeatCell> {
    if samples.is_empty() {
        return Vec::new();
    }

    let bucket_size = samples.len().div_ceil(HEATMAP_TIME_BUCKETS);
    let min_value = samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
    let max_value = samples
        .iter()
        .map(|s| s.value)
        .fold(f64::NEG_INFINITY, f64::max);

    let cell_width = dims.drawable_width() / HEATMAP_TIME_BUCKETS as f64;
    let cell_height = dims.drawable_height() / HEATMAP_VALUE_BUCKETS as f64;

    let mut cells = Vec::new();
    for i in 0..HEATMAP_TIME_BUCKETS {
        let start = i * bucket_size;
        let end = (start + bucket_size).min(samples.len());
        if start >= end {
            continue;
        }
        let bucket = &samples[start..end];
        let mean = bucket.iter().map(|s| s.value).sum::<f64>() / bucket.len() as f64;

        let intensity = scale_value(mean, min_value, max_value, 0.0, 1.0);
        let value_bucket = (scale_value(
            mean,
            min_value,
            max_value,
            0.0,
            HEATMAP_VALUE_BUCKETS as f64,
        )
        .floor() as usize)
            .min(HEATMAP_VALUE_BUCKETS - 1);

        cells.push(HeatCell {
            x: dims.padding.left + i as f64 * cell_width,
            y: dims.padding.top
                + (HEATMAP_VALUE_BUCKETS - value_bucket - 1) as f64 * cell_height,
            width: cell_width,
            height: cell_height,
            intensity,
            hue: (1.0 - intensity) * 240.0,
        });
    }
    cells
}

/// Formats an epoch-millisecond timestamp as a local `HH:MM:SS` clock string.
pub fn format_timestamp(timestamp: i64) -> String {
    use chrono::{Local, TimeZone};
    match Local.timestamp_millis_opt(timestamp).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => String::new(),
    }
}

pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}
