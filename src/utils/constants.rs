/// File names and defaults shared across the CLI and server

/// Reading history file, comma-separated with `#` comments.
pub const DATA_FILE: &str = "data.csv";

/// Threshold configuration file (JSON).
pub const RANGE_CONFIG_FILE: &str = "range.config";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ENVWATCH_DATA_DIR";

/// Environment variable carrying the API auth token.
pub const WEB_TOKEN_ENV: &str = "ENVWATCH_WEB_TOKEN";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// How many trailing readings a report includes.
pub const REPORT_RECENT_ROWS: usize = 5;

/// Sample reading history written on first run when no data file exists.
pub const SAMPLE_DATA: &str = "\
# 环境监测数据
# 时间,光照强度(lux),温度(℃),湿度(%),pH值,微生物密度(CFU/mL)
# 数据格式: YYYY-MM-DD HH:MM,数值1,数值2,数值3,数值4,数值5

2023-10-01 08:00,850.5,25.3,65.2,6.8,1200
2023-10-01 09:00,1200.2,26.1,63.8,6.9,1350
2023-10-01 10:00,1500.7,27.5,61.4,7.0,1450
2023-10-01 11:00,1800.3,28.9,59.2,7.1,1600
2023-10-01 12:00,2100.8,30.2,57.8,7.2,1750
2023-10-01 13:00,1900.1,29.8,58.3,7.1,1680
2023-10-01 14:00,1600.6,28.3,60.1,7.0,1520
2023-10-01 15:00,1300.4,26.8,62.5,6.9,1400
2023-10-01 16:00,950.9,25.1,64.9,6.8,1250
2023-10-01 17:00,700.2,23.8,67.3,6.7,1100";
