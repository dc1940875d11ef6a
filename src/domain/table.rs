// Windowed (virtualized) table math
use serde::Serialize;

/// Inputs for the windowed table view.
#[derive(Debug, Clone, Copy)]
pub struct WindowOptions {
    pub row_height: f64,
    pub container_height: f64,
    pub overscan: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            container_height: 400.0,
            overscan: 5,
        }
    }
}

/// The visible slice of a virtualized list: row indices plus the two
/// measurements the scroll container needs. Cost is O(overscan + visible
/// rows), independent of the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowedRows {
    pub start_index: usize,
    /// Inclusive.
    pub end_index: usize,
    /// `n * row_height`, for scrollbar sizing.
    pub total_height: u64,
    /// `start_index * row_height`, absolute offset of the rendered slice.
    pub offset_y: u64,
}

pub fn compute_window(item_count: usize, scroll_top: f64, options: &WindowOptions) -> WindowedRows {
    if item_count == 0 {
        return WindowedRows {
            start_index: 0,
            end_index: 0,
            total_height: 0,
            offset_y: 0,
        };
    }

    let first_visible = (scroll_top / options.row_height).floor() as isize;
    let last_visible =
        ((scroll_top + options.container_height) / options.row_height).ceil() as isize;
    let overscan = options.overscan as isize;
    let max_index = item_count as isize - 1;

    let start_index = (first_visible - overscan).clamp(0, max_index) as usize;
    let end_index = (last_visible + overscan).clamp(0, max_index) as usize;

    WindowedRows {
        start_index,
        end_index,
        total_height: item_count as u64 * options.row_height as u64,
        offset_y: start_index as u64 * options.row_height as u64,
    }
}

/// The rendered slice for a window (end index inclusive).
pub fn visible_slice<'a, T>(items: &'a [T], window: &WindowedRows) -> &'a [T] {
    if items.is_empty() {
        return items;
    }
    &items[window.start_index..=window.end_index.min(items.len() - 1)]
}
