/// HTTP API Server module for envwatch
/// Provides REST API endpoints that reuse core business logic

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod static_files;

pub use routes::create_router;

use crate::core::{ReadingsSource, ThresholdStore};
use crate::utils::{resolve_data_dir, DATA_FILE, RANGE_CONFIG_FILE, WEB_TOKEN_ENV};

pub async fn run(host: String, port: u16, enable_cors: bool) -> anyhow::Result<()> {
    use std::io::{self, Write};
    use std::net::SocketAddr;

    // Check if ENVWATCH_WEB_TOKEN is set, prompt if not
    if std::env::var(WEB_TOKEN_ENV).is_err() {
        println!("⚠️  {} environment variable not set!", WEB_TOKEN_ENV);
        println!("    This token is required to change thresholds over the API.");
        println!();
        print!("Enter a secure token (or press Enter to generate one): ");
        io::stdout().flush()?;

        let mut token = String::new();
        io::stdin().read_line(&mut token)?;
        let token = token.trim();

        let token = if token.is_empty() {
            let generated = auth::generate_token();
            println!("✓ Generated token: {}", generated);
            generated
        } else {
            token.to_string()
        };

        std::env::set_var(WEB_TOKEN_ENV, &token);
        println!("✓ Token set for this session");
        println!(
            "  To persist, add to your environment: export {}=\"{}\"",
            WEB_TOKEN_ENV, token
        );
        println!();
    }

    let app = create_router(enable_cors);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    println!("🌐 envwatch 环境数据监控服务器");
    println!("   📍 Dashboard: http://{}", addr);
    println!("   🔌 API:       http://{}/api", addr);

    println!("   🔒 Auth:      Enabled (token required for updates)");

    println!();
    println!("📚 API Endpoints:");
    println!("   GET  /api/data    - Readings, statuses and statistics");
    println!("   GET  /api/raw     - Raw CSV text");
    println!("   GET  /api/config  - Threshold configuration");
    println!("   PUT  /api/config  - Replace threshold configuration");
    println!("   GET  /api/health  - Health summary for the latest reading");
    println!("   GET  /api/report  - Statistics report");
    println!("   POST /api/update  - Force re-ingestion");
    println!();

    print_startup_summary();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse both sources once at startup and echo what was found, so a
/// misconfigured install is visible before the first request arrives.
fn print_startup_summary() {
    let Ok(dir) = resolve_data_dir() else {
        eprintln!("❌ Could not resolve data directory");
        return;
    };

    println!("📁 Data directory: {}", dir.display());

    let store = ThresholdStore::new(dir.join(RANGE_CONFIG_FILE));
    match store.load() {
        Ok(config) => {
            println!("✅ 配置文件加载成功 ({} 个指标)", config.len());
        }
        Err(err) => {
            eprintln!("❌ {}", err);
        }
    }

    let config = store.load_or_empty();
    let source = ReadingsSource::new(dir.join(DATA_FILE));
    let dataset = source.load_dataset(&config);

    match &dataset.error {
        Some(message) => eprintln!("❌ 数据解析失败: {}", message),
        None => {
            println!("✅ 成功解析 {} 条记录", dataset.readings.len());
            if let Some(range) = &dataset.statistics.time_range {
                println!("📈 数据时间范围: {} 到 {}", range.start, range.end);
            }
            println!(
                "🏥 数据健康状态: 正常 {}, 警告 {}, 危险 {}",
                dataset.status_summary.normal,
                dataset.status_summary.warning,
                dataset.status_summary.danger
            );
            if dataset.has_alerts {
                println!("⚠️  发现数据异常！");
            }
        }
    }

    println!();
}
