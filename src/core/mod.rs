pub mod classifier;
pub mod error;
pub mod health;
pub mod ingest;
pub mod metric;
pub mod report;
pub mod stats;
pub mod threshold;

pub use classifier::{classify, MetricStatus, StatusLevel};
pub use health::{build_health_summary, HealthLevel, HealthSummary};
pub use ingest::{ingest, Dataset, Reading, ReadingsSource};
pub use metric::Metric;
pub use report::Report;
pub use stats::{aggregate, AggregateStatistics};
pub use threshold::{MetricThreshold, ThresholdConfig, ThresholdStore};
