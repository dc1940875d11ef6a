// Time-bucket aggregation and filter pipeline stages
use crate::domain::sample::{AggregationPeriod, Sample, TimeRange};
use std::collections::BTreeMap;

struct Bucket {
    sum: f64,
    count: usize,
    // Category of the earliest-inserted sample in the bucket (first-wins).
    category: String,
}

/// Downsamples `samples` into fixed-width time buckets. Each bucket reduces to
/// the mean of its values; empty buckets are omitted. Output is sorted
/// ascending by bucket start.
pub fn aggregate(samples: &[Sample], period: AggregationPeriod) -> Vec<Sample> {
    let period_ms = period.period_ms();
    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();

    for sample in samples {
        let bucket_start = sample.timestamp.div_euclid(period_ms) * period_ms;
        buckets
            .entry(bucket_start)
            .and_modify(|b| {
                b.sum += sample.value;
                b.count += 1;
            })
            .or_insert_with(|| Bucket {
                sum: sample.value,
                count: 1,
                category: sample.category.clone(),
            });
    }

    buckets
        .into_iter()
        .map(|(bucket_start, bucket)| {
            Sample::new(bucket_start, bucket.sum / bucket.count as f64, bucket.category)
                .aggregated(bucket.count)
        })
        .collect()
}

/// Keeps samples whose category is in `selection`. An empty selection passes
/// everything through unchanged.
pub fn filter_by_category(samples: &[Sample], selection: &[String]) -> Vec<Sample> {
    if selection.is_empty() {
        return samples.to_vec();
    }
    samples
        .iter()
        .filter(|s| selection.iter().any(|c| c == &s.category))
        .cloned()
        .collect()
}

/// Keeps samples with `start <= timestamp <= end` (both bounds inclusive).
pub fn filter_by_time_range(samples: &[Sample], range: TimeRange) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| s.timestamp >= range.start && s.timestamp <= range.end)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: i64, value: f64, category: &str) -> Sample {
        Sample::new(ts, value, category.to_string())
    }

    #[test]
    fn test_single_bucket_mean_and_count() {
        let samples = vec![
            sample(1_000, 10.0, "temperature"),
            sample(2_000, 10.0, "temperature"),
            sample(3_000, 10.0, "temperature"),
        ];
        let out = aggregate(&samples, AggregationPeriod::OneMinute);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp, 0);
        assert_eq!(out[0].value, 10.0);
        assert_eq!(out[0].bucket_count(), Some(3));
    }

    #[test]
    fn test_output_sorted_and_counts_sum_to_input() {
        let samples: Vec<Sample> = (0..500)
            .map(|i| sample(i * 7_000, i as f64, "pressure"))
            .collect();
        let out = aggregate(&samples, AggregationPeriod::FiveMinutes);
        assert!(out.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let total: usize = out.iter().filter_map(|s| s.bucket_count()).sum();
        assert_eq!(total, samples.len());
    }

    #[test]
    fn test_mixed_bucket_takes_first_category() {
        let samples = vec![
            sample(10_000, 1.0, "humidity"),
            sample(20_000, 2.0, "voltage"),
        ];
        let out = aggregate(&samples, AggregationPeriod::OneMinute);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, "humidity");
        assert_eq!(out[0].value, 1.5);
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let samples = vec![
            sample(0, 1.0, "temperature"),
            // Skips many one-minute buckets
            sample(3_600_000, 2.0, "temperature"),
        ];
        let out = aggregate(&samples, AggregationPeriod::OneMinute);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_empty_category_selection_passes_through() {
        let samples = vec![sample(0, 1.0, "temperature"), sample(1, 2.0, "voltage")];
        assert_eq!(filter_by_category(&samples, &[]).len(), 2);
    }

    #[test]
    fn test_category_selection_filters() {
        let samples = vec![
            sample(0, 1.0, "temperature"),
            sample(1, 2.0, "voltage"),
            sample(2, 3.0, "temperature"),
        ];
        let out = filter_by_category(&samples, &["temperature".to_string()]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.category == "temperature"));
    }

    #[test]
    fn test_time_range_bounds_are_inclusive() {
        let samples: Vec<Sample> = (0..10).map(|i| sample(i, 0.0, "temperature")).collect();
        let out = filter_by_time_range(&samples, TimeRange { start: 3, end: 6 });
        let timestamps: Vec<i64> = out.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![3, 4, 5, 6]);
    }
}
