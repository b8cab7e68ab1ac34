/// Threshold classification of sensor readings
///
/// Evaluates each metric of a reading against its configured bounds and
/// produces a per-metric status. Danger is the outer band: a value outside
/// the warning bounds is danger, a value inside the warning bounds but
/// outside the normal bounds is warning, anything else is normal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ingest::Reading;
use crate::core::metric::Metric;
use crate::core::threshold::{MetricThreshold, ThresholdConfig};
use crate::utils::format_value;

/// Severity tier for a single metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Normal,
    Warning,
    Danger,
}

impl StatusLevel {
    pub fn is_alert(&self) -> bool {
        !matches!(self, StatusLevel::Normal)
    }

    /// Short symbol for CLI tables.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "OK",
            StatusLevel::Warning => "WARN",
            StatusLevel::Danger => "DANGER",
        }
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusLevel::Normal => "normal",
            StatusLevel::Warning => "warning",
            StatusLevel::Danger => "danger",
        };
        f.write_str(s)
    }
}

/// Classification result for one (reading, metric) pair. Never persisted:
/// recomputed on demand from the reading and the current config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatus {
    pub level: StatusLevel,
    pub message: String,
    pub value: f64,
    #[serde(rename = "range")]
    pub threshold: MetricThreshold,
}

/// Classify every metric of a reading that has both a value and a threshold
/// entry. Pure: same inputs always yield the same output.
pub fn classify(reading: &Reading, config: &ThresholdConfig) -> BTreeMap<Metric, MetricStatus> {
    let mut statuses = BTreeMap::new();

    for metric in Metric::ALL {
        let Some(value) = reading.value(metric) else {
            continue;
        };
        let Some(threshold) = config.get(metric) else {
            continue;
        };
        statuses.insert(metric, evaluate(metric, value, threshold));
    }

    statuses
}

/// Evaluate one value against one threshold. Danger (warning bounds) is
/// checked before warning (normal bounds); this priority holds even for
/// inconsistent configs where normal bounds fall outside warning bounds.
fn evaluate(metric: Metric, value: f64, threshold: &MetricThreshold) -> MetricStatus {
    let base = if threshold.description.is_empty() {
        metric.key()
    } else {
        threshold.description.as_str()
    };
    let unit = if threshold.unit.is_empty() {
        metric.default_unit()
    } else {
        threshold.unit.as_str()
    };

    let (level, message) = if let Some(min) = threshold.warning_min.filter(|&min| value < min) {
        (
            StatusLevel::Danger,
            format!("{} (低于危险下限 {}{})", base, format_value(min), unit),
        )
    } else if let Some(max) = threshold.warning_max.filter(|&max| value > max) {
        (
            StatusLevel::Danger,
            format!("{} (高于危险上限 {}{})", base, format_value(max), unit),
        )
    } else if let Some(min) = threshold.normal_min.filter(|&min| value < min) {
        (
            StatusLevel::Warning,
            format!("{} (低于正常范围 {}{})", base, format_value(min), unit),
        )
    } else if let Some(max) = threshold.normal_max.filter(|&max| value > max) {
        (
            StatusLevel::Warning,
            format!("{} (高于正常范围 {}{})", base, format_value(max), unit),
        )
    } else {
        (StatusLevel::Normal, format!("{}正常", base))
    };

    MetricStatus {
        level,
        message,
        value,
        threshold: threshold.clone(),
    }
}
