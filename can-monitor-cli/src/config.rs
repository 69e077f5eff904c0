//! Configuration loading and parsing

use anyhow::{Context, Result};
use can_monitor::{LineFormat, MonitorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub filtering: FilteringConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: LineFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    #[serde(default)]
    pub mode: DisplayMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            mode: DisplayMode::default(),
        }
    }
}

fn default_refresh_ms() -> u64 {
    can_monitor::refresh::DEFAULT_REFRESH_MS
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Full-screen view redrawn every tick, quit with `q`
    #[default]
    Terminal,
    /// Plain text dump whenever new lines arrive, exits at end of input
    Plain,
    /// One JSON object per update, exits at end of input
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilteringConfig {
    pub addresses: Option<Vec<u32>>,
}

impl AppConfig {
    /// Library configuration derived from this file
    pub fn monitor_config(&self) -> MonitorConfig {
        let config = MonitorConfig::new()
            .with_format(self.input.format)
            .with_refresh_ms(self.display.refresh_ms);
        match &self.filtering.addresses {
            Some(addresses) => config.with_address_filter(addresses.clone()),
            None => config,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .monitor_config()
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            format = "compact"

            [display]
            refresh_ms = 100
            mode = "plain"

            [filtering]
            addresses = [0x0a194005, 0x063d4000]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.format, LineFormat::Compact);
        assert_eq!(config.display.mode, DisplayMode::Plain);

        let monitor = config.monitor_config();
        assert_eq!(monitor.refresh_ms, 100);
        assert!(monitor.should_store(0x063d4000));
        assert!(!monitor.should_store(0x123));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.format, LineFormat::Auto);
        assert_eq!(config.display.refresh_ms, 50);
        assert_eq!(config.display.mode, DisplayMode::Terminal);
        assert!(config.filtering.addresses.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nrefresh_ms = 20").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.display.refresh_ms, 20);
    }

    #[test]
    fn test_load_config_rejects_zero_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nrefresh_ms = 0").unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("does-not-exist.toml")).is_err());
    }
}
