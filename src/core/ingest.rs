/// Sensor data ingestion
///
/// Parses the raw comma-separated reading history into typed readings,
/// classifies every accepted row against the current threshold config and
/// assembles the full dataset served to the CLI and the HTTP API.
///
/// Malformed rows are skipped with a diagnostic, never fatal: ingestion
/// returns whatever validly parses. An unreadable source degrades to an
/// empty dataset carrying an error message instead of failing the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::classifier::{classify, MetricStatus, StatusLevel};
use crate::core::error::IngestError;
use crate::core::metric::Metric;
use crate::core::stats::{aggregate, AggregateStatistics};
use crate::core::threshold::ThresholdConfig;
use crate::utils::{is_plausible_timestamp, SAMPLE_DATA};

/// One monitored instant. Immutable once parsed; `id` is the 1-based
/// position among accepted rows, not the raw line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: usize,
    #[serde(rename = "time")]
    pub timestamp: String,
    pub values: BTreeMap<Metric, f64>,
}

impl Reading {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }
}

/// Why a source line was skipped (or flagged) during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub line: usize,
    pub reason: String,
}

/// Status counts across every classified (row, metric) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub normal: usize,
    pub warning: usize,
    pub danger: usize,
}

/// Everything derived from one ingestion pass: readings, per-row statuses,
/// aggregate statistics, alert state and parse diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub readings: Vec<Reading>,
    /// Parallel to `readings`: statuses[i] classifies readings[i].
    pub statuses: Vec<BTreeMap<Metric, MetricStatus>>,
    pub statistics: AggregateStatistics,
    pub status_summary: StatusSummary,
    pub has_alerts: bool,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub config: ThresholdConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Dataset {
    /// Degraded result for an unreadable source: empty readings, empty
    /// statistics, no alerts, the error surfaced as a message.
    pub fn degraded(message: String, config: ThresholdConfig) -> Self {
        Self {
            readings: Vec::new(),
            statuses: Vec::new(),
            statistics: AggregateStatistics::default(),
            status_summary: StatusSummary::default(),
            has_alerts: false,
            diagnostics: Vec::new(),
            config,
            error: Some(message),
        }
    }

    /// The most recent reading and its statuses, if any.
    pub fn latest(&self) -> Option<(&Reading, &BTreeMap<Metric, MetricStatus>)> {
        match (self.readings.last(), self.statuses.last()) {
            (Some(reading), Some(statuses)) => Some((reading, statuses)),
            _ => None,
        }
    }

    /// The last `n` readings in sequence order.
    pub fn recent(&self, n: usize) -> &[Reading] {
        let start = self.readings.len().saturating_sub(n);
        &self.readings[start..]
    }
}

/// Parse and classify the full raw text in one pass.
pub fn ingest(raw: &str, config: &ThresholdConfig) -> Dataset {
    let (readings, diagnostics) = parse_rows(raw);

    let statuses: Vec<BTreeMap<Metric, MetricStatus>> =
        readings.iter().map(|r| classify(r, config)).collect();

    let mut status_summary = StatusSummary::default();
    let mut has_alerts = false;
    for row in &statuses {
        for status in row.values() {
            match status.level {
                StatusLevel::Normal => status_summary.normal += 1,
                StatusLevel::Warning => {
                    status_summary.warning += 1;
                    has_alerts = true;
                }
                StatusLevel::Danger => {
                    status_summary.danger += 1;
                    has_alerts = true;
                }
            }
        }
    }

    let statistics = aggregate(&readings);

    Dataset {
        readings,
        statuses,
        statistics,
        status_summary,
        has_alerts,
        diagnostics,
        config: config.clone(),
        error: None,
    }
}

/// Split the raw text into accepted readings plus diagnostics for everything
/// that was skipped or looked suspicious.
fn parse_rows(raw: &str) -> (Vec<Reading>, Vec<ParseDiagnostic>) {
    let mut readings = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 6 {
            diagnostics.push(ParseDiagnostic {
                line: line_no,
                reason: format!("expected at least 6 fields, got {}", parts.len()),
            });
            continue;
        }

        let timestamp = parts[0].trim().to_string();

        let mut values = BTreeMap::new();
        for metric in Metric::ALL {
            if let Some(field) = parts.get(metric.column()) {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                // Unparseable optional fields yield "value absent", they do
                // not reject the row
                if let Ok(value) = field.parse::<f64>() {
                    if value.is_finite() {
                        values.insert(metric, value);
                    }
                }
            }
        }

        let missing: Vec<&str> = Metric::ALL
            .into_iter()
            .filter(|m| m.required() && !values.contains_key(m))
            .map(|m| m.key())
            .collect();
        if !missing.is_empty() {
            diagnostics.push(ParseDiagnostic {
                line: line_no,
                reason: format!("non-numeric required field(s): {}", missing.join(", ")),
            });
            continue;
        }

        if !is_plausible_timestamp(&timestamp) {
            // Advisory only; the row is still accepted
            diagnostics.push(ParseDiagnostic {
                line: line_no,
                reason: format!("timestamp '{}' does not look like YYYY-MM-DD HH:MM", timestamp),
            });
        }

        readings.push(Reading {
            id: readings.len() + 1,
            timestamp,
            values,
        });
    }

    (readings, diagnostics)
}

/// File-backed readings source. Re-read in full on every request; no
/// caching, so the dashboard never serves stale data.
pub struct ReadingsSource {
    path: PathBuf,
}

impl ReadingsSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw text, materializing the bundled sample history on first
    /// run so a fresh install has something to show.
    pub fn read_raw(&self) -> Result<String, IngestError> {
        if !self.path.exists() {
            fs::write(&self.path, SAMPLE_DATA).map_err(|source| IngestError::Unreadable {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::read_to_string(&self.path).map_err(|source| IngestError::Unreadable {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the raw text without bootstrapping. The raw endpoint reports a
    /// missing file instead of materializing one.
    pub fn read_existing(&self) -> Result<String, IngestError> {
        fs::read_to_string(&self.path).map_err(|source| IngestError::Unreadable {
            path: self.path.clone(),
            source,
        })
    }

    /// Full ingestion cycle. Source errors degrade to an empty dataset.
    pub fn load_dataset(&self, config: &ThresholdConfig) -> Dataset {
        match self.read_raw() {
            Ok(raw) => ingest(&raw, config),
            Err(err) => Dataset::degraded(err.to_string(), config.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let raw = "# 环境监测数据\n\
                   \n\
                   2023-10-01 08:00,850.5,25.3,65.2,6.8,1200\n\
                   # trailing comment\n\
                   2023-10-01 09:00,1200.2,26.1,63.8,6.9,1350\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        assert_eq!(dataset.readings.len(), 2);
        assert!(dataset.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_row_is_skipped_with_diagnostic() {
        let raw = "2023-10-01 08:00,850.5,25.3,65.2,6.8,1200\n\
                   2023-10-01 09:00,broken\n\
                   2023-10-01 10:00,1500.7,27.5,61.4,7.0,1450\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        assert_eq!(dataset.readings.len(), 2);
        assert_eq!(dataset.readings[0].id, 1);
        assert_eq!(dataset.readings[1].id, 2);
        assert_eq!(dataset.diagnostics.len(), 1);
        assert_eq!(dataset.diagnostics[0].line, 2);
    }

    #[test]
    fn test_required_fields_must_be_numeric() {
        let raw = "2023-10-01 08:00,not-a-number,25.3,65.2,6.8,1200\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        assert!(dataset.readings.is_empty());
        assert_eq!(dataset.diagnostics.len(), 1);
        assert!(dataset.diagnostics[0].reason.contains("illumination_intensity"));
    }

    #[test]
    fn test_optional_fields_are_opportunistic() {
        // humidity unparseable, turbidity onward present for the first row only
        let raw = "2023-10-01 08:00,850.5,25.3,???,6.8,1200,3.2,45.0,8.1,520\n\
                   2023-10-01 09:00,1200.2,26.1,63.8,6.9,1350\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        assert_eq!(dataset.readings.len(), 2);

        let first = &dataset.readings[0];
        assert_eq!(first.value(Metric::Humidity), None);
        assert_eq!(first.value(Metric::Turbidity), Some(3.2));
        assert_eq!(first.value(Metric::ChemicalOxygenDemand), Some(45.0));
        assert_eq!(first.value(Metric::DissolvedOxygen), Some(8.1));
        assert_eq!(first.value(Metric::ElectricalConductivity), Some(520.0));

        let second = &dataset.readings[1];
        assert_eq!(second.value(Metric::Humidity), Some(63.8));
        assert_eq!(second.value(Metric::Turbidity), None);
    }

    #[test]
    fn test_alerts_and_status_summary() {
        // Default config: temperature warning band 15..35, normal 20..30
        let config = ThresholdConfig::built_in();
        let raw = "2023-10-01 08:00,850.5,25.3,65.2,6.8,1200\n\
                   2023-10-01 09:00,850.5,10.0,65.2,6.8,1200\n";

        let dataset = ingest(raw, &config);
        assert!(dataset.has_alerts);
        assert_eq!(dataset.status_summary.danger, 1);
        assert_eq!(
            dataset.status_summary.normal + dataset.status_summary.warning
                + dataset.status_summary.danger,
            10
        );
    }

    #[test]
    fn test_no_config_means_no_alerts() {
        let raw = "2023-10-01 08:00,850.5,-40.0,65.2,6.8,1200\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        assert!(!dataset.has_alerts);
        assert!(dataset.statuses[0].is_empty());
    }

    #[test]
    fn test_source_bootstraps_sample_data() {
        let dir = tempdir().unwrap();
        let source = ReadingsSource::new(dir.path().join("data.csv"));

        let dataset = source.load_dataset(&ThresholdConfig::built_in());
        assert!(dataset.error.is_none());
        assert!(!dataset.readings.is_empty());
        assert!(source.path().exists());
    }

    #[test]
    fn test_read_existing_does_not_bootstrap() {
        let dir = tempdir().unwrap();
        let source = ReadingsSource::new(dir.path().join("data.csv"));

        assert!(source.read_existing().is_err());
        assert!(!source.path().exists());

        fs::write(source.path(), "2023-10-01 08:00,850.5,25.3,65.2,6.8,1200\n").unwrap();
        assert!(source.read_existing().is_ok());
    }

    #[test]
    fn test_unreadable_source_degrades() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes both the bootstrap
        // write and the read fail
        let path = dir.path().join("data.csv");
        fs::create_dir(&path).unwrap();

        let source = ReadingsSource::new(&path);
        let dataset = source.load_dataset(&ThresholdConfig::built_in());
        assert!(dataset.error.is_some());
        assert!(dataset.readings.is_empty());
        assert!(!dataset.has_alerts);
    }

    #[test]
    fn test_latest_and_recent() {
        let raw = "2023-10-01 08:00,850.5,25.3,65.2,6.8,1200\n\
                   2023-10-01 09:00,1200.2,26.1,63.8,6.9,1350\n\
                   2023-10-01 10:00,1500.7,27.5,61.4,7.0,1450\n";

        let dataset = ingest(raw, &ThresholdConfig::default());
        let (latest, _) = dataset.latest().unwrap();
        assert_eq!(latest.id, 3);
        assert_eq!(dataset.recent(2).len(), 2);
        assert_eq!(dataset.recent(2)[0].id, 2);
        assert_eq!(dataset.recent(10).len(), 3);
    }
}
