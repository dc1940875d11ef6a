// Sample domain models
use serde::{Deserialize, Serialize};

/// The fixed category labels, in canonical order.
pub const CATEGORIES: [&str; 4] = ["temperature", "pressure", "humidity", "voltage"];

/// One timestamped, category-tagged numeric reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub value: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SampleMetadata>,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64, category: String) -> Self {
        Self {
            timestamp,
            value,
            category,
            metadata: None,
        }
    }

    /// Marks a sample as synthesized by the generator.
    pub fn generated(mut self) -> Self {
        self.metadata = Some(SampleMetadata {
            generated: true,
            ..SampleMetadata::default()
        });
        self
    }

    /// Marks a sample as the mean of `count` bucketed samples.
    pub fn aggregated(mut self, count: usize) -> Self {
        self.metadata = Some(SampleMetadata {
            aggregated: true,
            count: Some(count),
            ..SampleMetadata::default()
        });
        self
    }

    pub fn bucket_count(&self) -> Option<usize> {
        self.metadata.as_ref().and_then(|m| m.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleMetadata {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub generated: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub aggregated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Downsampling bucket width selected by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationPeriod {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "1hour")]
    OneHour,
}

impl AggregationPeriod {
    pub fn period_ms(&self) -> i64 {
        match self {
            AggregationPeriod::OneMinute => 60 * 1000,
            AggregationPeriod::FiveMinutes => 5 * 60 * 1000,
            AggregationPeriod::OneHour => 60 * 60 * 1000,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1min" => Some(AggregationPeriod::OneMinute),
            "5min" => Some(AggregationPeriod::FiveMinutes),
            "1hour" => Some(AggregationPeriod::OneHour),
            _ => None,
        }
    }
}

/// Inclusive timestamp range, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}
