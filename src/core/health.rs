/// Health summary derived from the most recent reading
///
/// Overall health is critical when any current metric is in danger, warning
/// when any alert exists at all, healthy otherwise.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::classifier::StatusLevel;
use crate::core::ingest::Dataset;
use crate::core::metric::Metric;
use crate::core::threshold::MetricThreshold;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthLevel::Healthy => "healthy",
            HealthLevel::Warning => "warning",
            HealthLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Current-value snapshot for one metric of the latest reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricHealth {
    pub current: f64,
    pub status: StatusLevel,
    pub message: String,
    pub config: MetricThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: Metric,
    pub level: StatusLevel,
    pub message: String,
    pub value: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub overall_health: HealthLevel,
    pub timestamp: String,
    pub total_records: usize,
    pub has_alerts: bool,
    pub metrics: BTreeMap<Metric, MetricHealth>,
    pub alerts: Vec<Alert>,
}

/// Build the health summary from an ingested dataset. With no readings the
/// summary is healthy-but-empty; callers display "unknown" rather than fail.
pub fn build_health_summary(dataset: &Dataset) -> HealthSummary {
    let mut summary = HealthSummary {
        overall_health: HealthLevel::Healthy,
        timestamp: Utc::now().to_rfc3339(),
        total_records: dataset.readings.len(),
        has_alerts: dataset.has_alerts,
        metrics: BTreeMap::new(),
        alerts: Vec::new(),
    };

    let Some((reading, statuses)) = dataset.latest() else {
        return summary;
    };

    for (metric, status) in statuses {
        summary.metrics.insert(*metric, MetricHealth {
            current: status.value,
            status: status.level,
            message: status.message.clone(),
            config: status.threshold.clone(),
        });

        if status.level.is_alert() {
            summary.alerts.push(Alert {
                metric: *metric,
                level: status.level,
                message: status.message.clone(),
                value: status.value,
                timestamp: reading.timestamp.clone(),
            });
        }
    }

    if summary.alerts.iter().any(|a| a.level == StatusLevel::Danger) {
        summary.overall_health = HealthLevel::Critical;
    } else if !summary.alerts.is_empty() {
        summary.overall_health = HealthLevel::Warning;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::ingest;
    use crate::core::threshold::ThresholdConfig;

    #[test]
    fn test_empty_dataset_is_healthy() {
        let dataset = ingest("", &ThresholdConfig::built_in());
        let summary = build_health_summary(&dataset);

        assert_eq!(summary.overall_health, HealthLevel::Healthy);
        assert_eq!(summary.total_records, 0);
        assert!(summary.metrics.is_empty());
        assert!(summary.alerts.is_empty());
    }

    #[test]
    fn test_only_latest_reading_drives_health() {
        // First row is out of range, last row is fine: overall healthy
        let raw = "2023-10-01 08:00,850.5,10.0,65.2,6.8,1200\n\
                   2023-10-01 09:00,850.5,25.0,65.2,6.8,1200\n";
        let dataset = ingest(raw, &ThresholdConfig::built_in());

        let summary = build_health_summary(&dataset);
        assert_eq!(summary.overall_health, HealthLevel::Healthy);
        assert!(summary.alerts.is_empty());
        // hasAlerts still reflects the whole history
        assert!(summary.has_alerts);
    }

    #[test]
    fn test_danger_in_latest_reading_is_critical() {
        let raw = "2023-10-01 08:00,850.5,10.0,65.2,6.8,1200\n";
        let dataset = ingest(raw, &ThresholdConfig::built_in());

        let summary = build_health_summary(&dataset);
        assert_eq!(summary.overall_health, HealthLevel::Critical);
        assert_eq!(summary.alerts.len(), 1);
        assert_eq!(summary.alerts[0].metric, Metric::Temperature);
        assert_eq!(summary.alerts[0].timestamp, "2023-10-01 08:00");
    }

    #[test]
    fn test_warning_without_danger() {
        // temperature 17 is below the normal band but inside the warning band
        let raw = "2023-10-01 08:00,850.5,17.0,65.2,6.8,1200\n";
        let dataset = ingest(raw, &ThresholdConfig::built_in());

        let summary = build_health_summary(&dataset);
        assert_eq!(summary.overall_health, HealthLevel::Warning);
    }

    #[test]
    fn test_metrics_cover_all_configured_current_values() {
        let raw = "2023-10-01 08:00,850.5,25.0,65.2,6.8,1200\n";
        let dataset = ingest(raw, &ThresholdConfig::built_in());

        let summary = build_health_summary(&dataset);
        // Five configured metrics, all present in the row
        assert_eq!(summary.metrics.len(), 5);
        assert_eq!(summary.metrics[&Metric::Temperature].current, 25.0);
    }
}
