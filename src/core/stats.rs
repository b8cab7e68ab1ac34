/// Descriptive statistics over the reading history
///
/// Full recompute on every call; no incremental state. Statistics cover
/// every metric with at least one present value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ingest::Reading;
use crate::core::metric::Metric;

/// Per-metric descriptive statistics. `stdDev` is the population standard
/// deviation (divide by count, not count - 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
    #[serde(rename = "stdDev")]
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStatistics {
    pub total_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    pub metrics: BTreeMap<Metric, MetricStats>,
}

/// Aggregate an ordered sequence of readings. Readings are assumed to be
/// time-ordered already; the time range is taken from sequence order. An
/// empty sequence yields a zero-valued result.
pub fn aggregate(readings: &[Reading]) -> AggregateStatistics {
    let mut stats = AggregateStatistics {
        total_records: readings.len(),
        time_range: None,
        metrics: BTreeMap::new(),
    };

    if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
        stats.time_range = Some(TimeRange {
            start: first.timestamp.clone(),
            end: last.timestamp.clone(),
        });
    }

    for metric in Metric::ALL {
        let values: Vec<f64> = readings.iter().filter_map(|r| r.value(metric)).collect();
        if values.is_empty() {
            continue;
        }
        stats.metrics.insert(metric, compute(&values));
    }

    stats
}

fn compute(values: &[f64]) -> MetricStats {
    let count = values.len();
    let sum: f64 = values.iter().sum();
    let avg = sum / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / count as f64;
    let std_dev = variance.sqrt();

    MetricStats {
        avg,
        min,
        max,
        sum,
        count,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: usize, timestamp: &str, values: &[(Metric, f64)]) -> Reading {
        Reading {
            id,
            timestamp: timestamp.to_string(),
            values: values.iter().copied().collect(),
        }
    }

    #[test]
    fn test_empty_sequence() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_records, 0);
        assert!(stats.time_range.is_none());
        assert!(stats.metrics.is_empty());
    }

    #[test]
    fn test_population_std_dev() {
        let readings = vec![
            reading(1, "2023-10-01 08:00", &[(Metric::Temperature, 20.0)]),
            reading(2, "2023-10-01 09:00", &[(Metric::Temperature, 30.0)]),
        ];

        let stats = aggregate(&readings);
        let temp = &stats.metrics[&Metric::Temperature];
        assert_eq!(temp.avg, 25.0);
        assert_eq!(temp.min, 20.0);
        assert_eq!(temp.max, 30.0);
        assert_eq!(temp.sum, 50.0);
        assert_eq!(temp.count, 2);
        // sqrt(((20-25)^2 + (30-25)^2) / 2) = 5, not the sample formula
        assert_eq!(temp.std_dev, 5.0);
    }

    #[test]
    fn test_time_range_follows_sequence_order() {
        let readings = vec![
            reading(1, "2023-10-01 08:00", &[(Metric::Temperature, 25.0)]),
            reading(2, "2023-10-01 09:00", &[(Metric::Temperature, 26.0)]),
            reading(3, "2023-10-01 10:00", &[(Metric::Temperature, 27.0)]),
        ];

        let stats = aggregate(&readings);
        let range = stats.time_range.unwrap();
        assert_eq!(range.start, "2023-10-01 08:00");
        assert_eq!(range.end, "2023-10-01 10:00");
        assert_eq!(stats.total_records, 3);
    }

    #[test]
    fn test_metric_absent_everywhere_is_excluded() {
        let readings = vec![reading(1, "2023-10-01 08:00", &[(Metric::Temperature, 25.0)])];

        let stats = aggregate(&readings);
        assert!(stats.metrics.contains_key(&Metric::Temperature));
        assert!(!stats.metrics.contains_key(&Metric::Turbidity));
    }

    #[test]
    fn test_partial_presence_counts_only_present_values() {
        let readings = vec![
            reading(1, "08:00", &[(Metric::Temperature, 25.0), (Metric::Turbidity, 2.0)]),
            reading(2, "09:00", &[(Metric::Temperature, 27.0)]),
        ];

        let stats = aggregate(&readings);
        assert_eq!(stats.metrics[&Metric::Temperature].count, 2);
        assert_eq!(stats.metrics[&Metric::Turbidity].count, 1);
        assert_eq!(stats.metrics[&Metric::Turbidity].avg, 2.0);
        assert_eq!(stats.metrics[&Metric::Turbidity].std_dev, 0.0);
    }

    #[test]
    fn test_idempotent_over_unchanged_input() {
        let readings = vec![
            reading(1, "08:00", &[(Metric::Ph, 6.8), (Metric::Humidity, 61.5)]),
            reading(2, "09:00", &[(Metric::Ph, 7.1), (Metric::Humidity, 58.2)]),
            reading(3, "10:00", &[(Metric::Ph, 7.0)]),
        ];

        assert_eq!(aggregate(&readings), aggregate(&readings));
    }
}
