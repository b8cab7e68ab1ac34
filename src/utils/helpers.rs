/// Helper utilities for envwatch

use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::utils::{AppConfig, DATA_DIR_ENV, DATA_FILE};

/// Resolve the directory holding `data.csv` and `range.config`.
///
/// Resolution order:
/// 1. Saved preference in ~/.config/envwatch/config.toml
/// 2. The ENVWATCH_DATA_DIR environment variable
/// 3. Search for data.csv in the current directory and its parents
/// 4. The current directory (files are bootstrapped there on first use)
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(config) = AppConfig::load() {
        if let Some(dir) = config.data_dir {
            let path = PathBuf::from(&dir);
            if path.is_dir() {
                return Ok(path);
            }
        }
    }

    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let env_dir = std::env::var(DATA_DIR_ENV).ok();

    Ok(resolve_from(env_dir.as_deref(), &current_dir))
}

/// Environment and search steps of the cascade. An env override must point
/// at an existing directory; otherwise the search walks upward from `start`
/// looking for the data file, falling back to `start` itself.
fn resolve_from(env_dir: Option<&str>, start: &Path) -> PathBuf {
    if let Some(dir) = env_dir {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return path;
        }
    }

    let mut dir = start;
    loop {
        if dir.join(DATA_FILE).exists() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    start.to_path_buf()
}

/// Loose shape check for reading timestamps (`YYYY-MM-DD HH:MM`, optionally
/// with seconds or a `T` separator). Used for advisory diagnostics only.
pub fn is_plausible_timestamp(value: &str) -> bool {
    static TIMESTAMP_RE: OnceLock<Regex> = OnceLock::new();

    let re = TIMESTAMP_RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(:\d{2})?$").unwrap()
    });

    re.is_match(value)
}

/// Format a bound or reading value the way the config file writes it:
/// integers without a trailing `.0`, everything else as-is.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_env_dir_wins_over_search() {
        let env_dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        fs::write(other.path().join(DATA_FILE), "").unwrap();

        let resolved = resolve_from(env_dir.path().to_str(), other.path());
        assert_eq!(resolved, env_dir.path());
    }

    #[test]
    fn test_missing_env_dir_falls_through_to_search() {
        let root = tempdir().unwrap();
        fs::write(root.path().join(DATA_FILE), "").unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        // Env points nowhere; the upward search from the nested directory
        // must find the data file two levels up
        let resolved = resolve_from(Some("/no/such/dir"), &nested);
        assert_eq!(resolved, root.path());
    }

    #[test]
    fn test_plausible_timestamps() {
        assert!(is_plausible_timestamp("2023-10-01 08:00"));
        assert!(is_plausible_timestamp("2023-10-01T08:00"));
        assert!(is_plausible_timestamp("2023-10-01 08:00:30"));

        assert!(!is_plausible_timestamp("08:00"));
        assert!(!is_plausible_timestamp("2023/10/01 08:00"));
        assert!(!is_plausible_timestamp("850.5"));
        assert!(!is_plausible_timestamp(""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(15.0), "15");
        assert_eq!(format_value(6.5), "6.5");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(0.25), "0.25");
    }
}
