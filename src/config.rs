use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = ".config/weight_estimator.toml";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_rules_path")]
    pub rules_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_rules_path() -> String {
    "rules/base.toml".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Decimals for the printed totals.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

fn default_decimals() -> usize {
    2
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            log_level: default_log_level(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path` if it exists, otherwise use defaults. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "No config file — using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let cfg = Config::load_or_default(dir.path().join("none.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.rules_path, "rules/base.toml");
        assert_eq!(cfg.report.decimals, 2);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "rules_path = \"shop/rules.toml\"\n[report]\ndecimals = 3\n").unwrap();

        let cfg = Config::load_or_default(&path).unwrap();
        assert_eq!(cfg.rules_path, "shop/rules.toml");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.report.decimals, 3);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        fs::write(&path, "rules_path = [").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
