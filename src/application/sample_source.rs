// Source trait for synthesized sample data
use crate::domain::sample::Sample;
use async_trait::async_trait;

pub const INITIAL_COUNT_MIN: usize = 500;
pub const INITIAL_COUNT_MAX: usize = 20_000;

/// Clamp a requested initial-load size to the supported range.
pub fn clamp_initial_count(count: usize) -> usize {
    count.clamp(INITIAL_COUNT_MIN, INITIAL_COUNT_MAX)
}

#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Synthesize `count` samples spaced 1000ms apart, ending at the current
    /// time, with categories cycling through the fixed label set.
    async fn initial(&self, count: usize) -> anyhow::Result<Vec<Sample>>;

    /// Synthesize the successor sample 100ms after `last_timestamp`. An
    /// unspecified category is picked uniformly at random.
    async fn next(&self, last_timestamp: i64, category: Option<&str>) -> anyhow::Result<Sample>;
}
