/// Threshold configuration management
///
/// Handles loading, validating and atomically replacing the per-metric
/// normal/warning bound definitions stored as JSON in `range.config`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::error::ConfigError;
use crate::core::metric::Metric;

/// Bound definitions for one metric. All four bounds are independently
/// optional; an absent bound never triggers a breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_max: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

impl MetricThreshold {
    /// Check bound consistency. The classifier tolerates inconsistent bounds
    /// (tier priority still applies), but `replace` refuses to persist them.
    pub fn validate(&self, metric: Metric) -> Result<(), ConfigError> {
        if let (Some(min), Some(max)) = (self.normal_min, self.normal_max) {
            if min > max {
                return Err(ConfigError::Invalid {
                    metric: metric.key(),
                    reason: format!("normal_min {} exceeds normal_max {}", min, max),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.warning_min, self.warning_max) {
            if min > max {
                return Err(ConfigError::Invalid {
                    metric: metric.key(),
                    reason: format!("warning_min {} exceeds warning_max {}", min, max),
                });
            }
        }
        Ok(())
    }
}

/// Full threshold configuration keyed by metric. Metrics absent from the map
/// never alert and are excluded from health reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig {
    entries: BTreeMap<Metric, MetricThreshold>,
}

impl ThresholdConfig {
    pub fn get(&self, metric: Metric) -> Option<&MetricThreshold> {
        self.entries.get(&metric)
    }

    pub fn insert(&mut self, metric: Metric, threshold: MetricThreshold) {
        self.entries.insert(metric, threshold);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricThreshold)> {
        self.entries.iter().map(|(m, t)| (*m, t))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (metric, threshold) in self.iter() {
            threshold.validate(metric)?;
        }
        Ok(())
    }

    /// Built-in default covering the five original metrics. The four newer
    /// metrics (turbidity, COD, DO, EC) start without thresholds.
    pub fn built_in() -> Self {
        let mut config = ThresholdConfig::default();

        config.insert(Metric::IlluminationIntensity, MetricThreshold {
            normal_min: Some(500.0),
            normal_max: Some(1500.0),
            warning_min: Some(300.0),
            warning_max: Some(2000.0),
            unit: "lux".to_string(),
            description: "光照强度".to_string(),
        });
        config.insert(Metric::Temperature, MetricThreshold {
            normal_min: Some(20.0),
            normal_max: Some(30.0),
            warning_min: Some(15.0),
            warning_max: Some(35.0),
            unit: "℃".to_string(),
            description: "温度".to_string(),
        });
        config.insert(Metric::Humidity, MetricThreshold {
            normal_min: Some(40.0),
            normal_max: Some(80.0),
            warning_min: Some(30.0),
            warning_max: Some(90.0),
            unit: "%".to_string(),
            description: "湿度".to_string(),
        });
        config.insert(Metric::Ph, MetricThreshold {
            normal_min: Some(6.5),
            normal_max: Some(7.5),
            warning_min: Some(6.0),
            warning_max: Some(8.0),
            unit: "pH".to_string(),
            description: "酸碱度".to_string(),
        });
        config.insert(Metric::MicrobialDensity, MetricThreshold {
            normal_min: Some(800.0),
            normal_max: Some(1800.0),
            warning_min: Some(500.0),
            warning_max: Some(2500.0),
            unit: "CFU/mL".to_string(),
            description: "微生物密度".to_string(),
        });

        config
    }
}

// Serializes concurrent replace calls so a load never observes a
// partially-written file.
static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// File-backed store for the threshold configuration.
pub struct ThresholdStore {
    path: PathBuf,
}

impl ThresholdStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration. If no file exists yet, the built-in default
    /// is materialized and persisted first.
    pub fn load(&self) -> Result<ThresholdConfig, ConfigError> {
        if !self.path.exists() {
            let config = ThresholdConfig::built_in();
            self.write_atomic(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Load {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load for classification purposes: a broken config degrades to "no
    /// thresholds" (everything classifies normal) instead of failing.
    pub fn load_or_empty(&self) -> ThresholdConfig {
        match self.load() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("⚠️  {}", err);
                ThresholdConfig::default()
            }
        }
    }

    /// Replace the configuration wholesale: validate, then atomically swap
    /// the file. On any failure the prior configuration stays in effect.
    pub fn replace(&self, config: &ThresholdConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let _guard = WRITE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.write_atomic(config)
    }

    fn write_atomic(&self, config: &ThresholdConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(|err| ConfigError::Write {
            path: self.path.clone(),
            source: std::io::Error::other(err),
        })?;

        // Write-then-rename within the same directory keeps the swap atomic.
        let tmp = self.path.with_extension("config.tmp");
        fs::write(&tmp, json).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_materializes_default() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path().join("range.config"));

        let config = store.load().unwrap();
        assert_eq!(config.len(), 5);
        assert!(config.get(Metric::Temperature).is_some());
        assert!(config.get(Metric::Turbidity).is_none());

        // The default must have been persisted as well
        assert!(store.path().exists());
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_replace_round_trip() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path().join("range.config"));

        let mut config = ThresholdConfig::default();
        config.insert(Metric::Turbidity, MetricThreshold {
            normal_min: Some(0.0),
            normal_max: Some(5.0),
            warning_min: None,
            warning_max: Some(10.0),
            unit: "NTU".to_string(),
            description: "浊度".to_string(),
        });

        store.replace(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_replace_rejects_inverted_bounds() {
        let dir = tempdir().unwrap();
        let store = ThresholdStore::new(dir.path().join("range.config"));
        let prior = store.load().unwrap();

        let mut bad = ThresholdConfig::default();
        bad.insert(Metric::Ph, MetricThreshold {
            normal_min: Some(8.0),
            normal_max: Some(6.0),
            warning_min: None,
            warning_max: None,
            unit: "pH".to_string(),
            description: "酸碱度".to_string(),
        });

        let err = store.replace(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { metric: "ph", .. }));

        // Prior configuration remains in effect
        assert_eq!(store.load().unwrap(), prior);
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("range.config");
        fs::write(&path, "{ not json").unwrap();

        let store = ThresholdStore::new(&path);
        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn test_unknown_metric_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("range.config");
        fs::write(&path, r#"{"pressure": {"unit": "Pa", "description": ""}}"#).unwrap();

        let store = ThresholdStore::new(&path);
        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }
}
