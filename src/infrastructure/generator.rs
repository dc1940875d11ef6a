// Synthetic sample generator - the in-process data source
use crate::application::sample_source::SampleSource;
use crate::domain::sample::{Sample, CATEGORIES};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

const VARIANCE_AMPLITUDE: f64 = 15.0;

/// Synthesizes plausible readings: a slow sine on top of a per-category base
/// value, plus bounded uniform noise. Deterministic except for the noise term.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSampleGenerator;

impl SyntheticSampleGenerator {
    pub fn new() -> Self {
        Self
    }

    /// `value = max(0, base + sin(t/1000 * 0.1) * variance + noise)` with
    /// noise uniform in `±variance * 0.25`.
    pub fn compute(timestamp: i64, category: &str, base_value: f64, variance: f64) -> Sample {
        let sine = ((timestamp as f64 / 1000.0) * 0.1).sin() * variance;
        let noise = (rand::rng().random::<f64>() - 0.5) * variance * 0.5;
        let value = (base_value + sine + noise).max(0.0);
        Sample::new(timestamp, value, category.to_string()).generated()
    }
}

#[async_trait]
impl SampleSource for SyntheticSampleGenerator {
    async fn initial(&self, count: usize) -> anyhow::Result<Vec<Sample>> {
        let now = Utc::now().timestamp_millis();
        let samples = (0..count)
            .map(|i| {
                let timestamp = now - (count - i) as i64 * 1000;
                let category = CATEGORIES[i % CATEGORIES.len()];
                let base_value = 50.0 + (i % 4) as f64 * 25.0;
                Self::compute(timestamp, category, base_value, VARIANCE_AMPLITUDE)
            })
            .collect();
        Ok(samples)
    }

    async fn next(&self, last_timestamp: i64, category: Option<&str>) -> anyhow::Result<Sample> {
        let timestamp = last_timestamp + 100;
        let mut rng = rand::rng();
        let category = match category {
            Some(c) => c.to_string(),
            None => CATEGORIES[rng.random_range(0..CATEGORIES.len())].to_string(),
        };
        let base_value = 50.0 + rng.random_range(0..4) as f64 * 25.0;
        Ok(Self::compute(
            timestamp,
            &category,
            base_value,
            VARIANCE_AMPLITUDE,
        ))
    }
}
