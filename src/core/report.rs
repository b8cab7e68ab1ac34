/// Monitoring report assembly

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::ingest::{Dataset, Reading, StatusSummary};
use crate::core::stats::AggregateStatistics;
use crate::core::threshold::ThresholdConfig;
use crate::utils::REPORT_RECENT_ROWS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_data_points: usize,
    pub time_period: String,
    pub data_health: StatusSummary,
    pub has_alerts: bool,
}

/// Statistics + config + the most recent readings, bundled for `/api/report`
/// and the `report` CLI command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: String,
    pub summary: ReportSummary,
    pub statistics: AggregateStatistics,
    pub config_ranges: ThresholdConfig,
    pub recent_data: Vec<Reading>,
}

impl Report {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let time_period = match &dataset.statistics.time_range {
            Some(range) => format!("{} 到 {}", range.start, range.end),
            None => "无数据".to_string(),
        };

        Self {
            generated_at: Utc::now().to_rfc3339(),
            summary: ReportSummary {
                total_data_points: dataset.readings.len(),
                time_period,
                data_health: dataset.status_summary,
                has_alerts: dataset.has_alerts,
            },
            statistics: dataset.statistics.clone(),
            config_ranges: dataset.config.clone(),
            recent_data: dataset.recent(REPORT_RECENT_ROWS).to_vec(),
        }
    }
}
