// View service - filter pipeline and table windowing over the live buffer
use crate::application::state::{DashboardState, ViewSelection};
use crate::domain::aggregate::{aggregate, filter_by_category, filter_by_time_range};
use crate::domain::chart::{format_timestamp, format_value};
use crate::domain::sample::{AggregationPeriod, Sample};
use crate::domain::table::{compute_window, visible_slice, WindowOptions, WindowedRows};
use serde::Serialize;
use std::sync::Arc;

/// One table row with its display strings precomputed, so clients render
/// cells without reformatting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub timestamp: i64,
    /// Local `HH:MM:SS` clock string for the timestamp cell.
    pub time: String,
    pub value: f64,
    /// Two-decimal fixed rendering for the value cell.
    pub display_value: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_count: Option<usize>,
}

impl TableRow {
    fn from_sample(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            time: format_timestamp(sample.timestamp),
            value: sample.value,
            display_value: format_value(sample.value),
            category: sample.category.clone(),
            bucket_count: sample.bucket_count(),
        }
    }
}

/// The filtered view over the live buffer plus the table window metadata for
/// the same rows sorted descending by timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    pub samples: Vec<Sample>,
    pub total_rows: usize,
    pub window: WindowedRows,
    pub rows: Vec<TableRow>,
}

#[derive(Clone)]
pub struct ViewService {
    state: Arc<DashboardState>,
    window_options: WindowOptions,
}

impl ViewService {
    pub fn new(state: Arc<DashboardState>, window_options: WindowOptions) -> Self {
        Self {
            state,
            window_options,
        }
    }

    /// Fixed pipeline order: category filter, then time-range filter, then
    /// aggregation. The raw one-minute period is the identity view.
    pub fn apply_pipeline(samples: Vec<Sample>, selection: &ViewSelection) -> Vec<Sample> {
        let mut result = samples;
        if !selection.categories.is_empty() {
            result = filter_by_category(&result, &selection.categories);
        }
        if let Some(range) = selection.time_range {
            result = filter_by_time_range(&result, range);
        }
        if selection.period != AggregationPeriod::OneMinute {
            result = aggregate(&result, selection.period);
        }
        result
    }

    /// The filtered view under the stored selection, consumed by the render
    /// loop every frame.
    pub fn filtered_samples(&self) -> Vec<Sample> {
        Self::apply_pipeline(self.state.snapshot(), &self.state.selection())
    }

    /// The filtered view under an explicit selection, with the table window
    /// computed at `scroll_top` over rows sorted descending by timestamp.
    pub fn view_for(&self, selection: &ViewSelection, scroll_top: f64) -> FilteredView {
        let samples = Self::apply_pipeline(self.state.snapshot(), selection);

        let mut rows = samples.clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let window = compute_window(rows.len(), scroll_top, &self.window_options);
        let visible = visible_slice(&rows, &window)
            .iter()
            .map(TableRow::from_sample)
            .collect();

        FilteredView {
            total_rows: rows.len(),
            window,
            rows: visible,
            samples,
        }
    }
}
