use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use envwatch::cli::{Cli, Commands, ConfigCommands};
use envwatch::core::{
    build_health_summary, Dataset, HealthLevel, ReadingsSource, StatusLevel, ThresholdConfig,
    ThresholdStore,
};
use envwatch::utils::{format_value, resolve_data_dir, AppConfig, DATA_FILE, RANGE_CONFIG_FILE};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Status) => {
            handle_status()?;
        }
        Some(Commands::Check) => {
            handle_check()?;
        }
        Some(Commands::Report) => {
            handle_report()?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command)?;
        }
        #[cfg(feature = "server")]
        Some(Commands::Serve { port, host, cors }) => {
            envwatch::server::run(host, port, cors).await?;
        }
    }

    Ok(())
}

fn load_dataset() -> Result<Dataset> {
    let dir = resolve_data_dir()?;
    let store = ThresholdStore::new(dir.join(RANGE_CONFIG_FILE));
    let config = store.load_or_empty();
    let source = ReadingsSource::new(dir.join(DATA_FILE));

    Ok(source.load_dataset(&config))
}

fn level_tag(level: StatusLevel) -> colored::ColoredString {
    let tag = level.symbol();
    match level {
        StatusLevel::Normal => tag.green(),
        StatusLevel::Warning => tag.yellow(),
        StatusLevel::Danger => tag.red(),
    }
}

fn handle_status() -> Result<()> {
    let dataset = load_dataset()?;

    println!("envwatch 环境数据状态\n");

    if let Some(message) = &dataset.error {
        println!("{} {}", "✗".red(), message);
        return Ok(());
    }

    let Some((reading, statuses)) = dataset.latest() else {
        println!("No readings found.");
        return Ok(());
    };

    println!("最新记录: #{} @ {}", reading.id, reading.timestamp);
    println!();
    println!("{:<24} {:>10}  {:<8} {}", "Metric", "Value", "Status", "Message");
    println!("{}", "-".repeat(72));

    for (metric, status) in statuses {
        println!(
            "{:<24} {:>10}  {:<8} {}",
            metric.key(),
            format_value(status.value),
            level_tag(status.level),
            status.message
        );
    }

    println!();
    println!(
        "记录总数 {} | 正常 {} | 警告 {} | 危险 {}",
        dataset.readings.len(),
        dataset.status_summary.normal,
        format!("{}", dataset.status_summary.warning).yellow(),
        format!("{}", dataset.status_summary.danger).red()
    );

    if !dataset.diagnostics.is_empty() {
        println!();
        println!("{} parse warning(s):", dataset.diagnostics.len());
        for diag in &dataset.diagnostics {
            println!("  line {}: {}", diag.line, diag.reason);
        }
    }

    Ok(())
}

fn handle_check() -> Result<()> {
    let dataset = load_dataset()?;
    let summary = build_health_summary(&dataset);

    let overall = match summary.overall_health {
        HealthLevel::Healthy => "healthy".green(),
        HealthLevel::Warning => "warning".yellow(),
        HealthLevel::Critical => "critical".red(),
    };

    println!("envwatch 健康检查\n");
    println!("整体状态: {}", overall);
    println!("记录总数: {}", summary.total_records);

    if summary.alerts.is_empty() {
        println!("\n无告警");
    } else {
        println!("\n告警:");
        for alert in &summary.alerts {
            println!(
                "  [{}] {} {} = {} - {} ({})",
                level_tag(alert.level),
                alert.metric.label(),
                alert.metric.key(),
                format_value(alert.value),
                alert.message,
                alert.timestamp
            );
        }
    }

    Ok(())
}

fn handle_report() -> Result<()> {
    let dataset = load_dataset()?;

    println!("envwatch 数据报告\n");

    if let Some(message) = &dataset.error {
        println!("{} {}", "✗".red(), message);
        return Ok(());
    }

    match &dataset.statistics.time_range {
        Some(range) => println!("时间范围: {} 到 {}", range.start, range.end),
        None => println!("时间范围: 无数据"),
    }
    println!("记录总数: {}\n", dataset.statistics.total_records);

    println!(
        "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Count", "Avg", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(76));

    for (metric, stats) in &dataset.statistics.metrics {
        println!(
            "{:<24} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            metric.key(),
            stats.count,
            stats.avg,
            stats.min,
            stats.max,
            stats.std_dev
        );
    }

    Ok(())
}

fn handle_config(command: ConfigCommands) -> Result<()> {
    let dir = resolve_data_dir()?;
    let store = ThresholdStore::new(dir.join(RANGE_CONFIG_FILE));

    match command {
        ConfigCommands::View => {
            let config = store.load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Validate => match store.load() {
            Ok(config) => {
                config.validate()?;
                println!("{} {} threshold(s) valid", "✓".green(), config.len());
            }
            Err(err) => {
                println!("{} {}", "✗".red(), err);
            }
        },
        ConfigCommands::Reset => {
            store.replace(&ThresholdConfig::built_in())?;
            println!("{} Thresholds reset to built-in defaults", "✓".green());
            println!("  {}", store.path().display());
        }
        ConfigCommands::SetDir { path } => {
            let mut app_config = AppConfig::load()?;
            app_config.set_data_dir(&path)?;
            println!("{} Data directory set to {}", "✓".green(), path);
        }
    }

    Ok(())
}
