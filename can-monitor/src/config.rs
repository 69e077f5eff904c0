//! Monitor configuration types
//!
//! The minimal configuration the library needs: which input grammar to expect,
//! how often the presentation side refreshes, and an optional address filter.

use crate::formats::LineFormat;
use crate::refresh::DEFAULT_REFRESH_MS;
use crate::types::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the monitor library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Input line grammar
    #[serde(default)]
    pub format: LineFormat,

    /// Refresh interval of the presentation loop in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,

    /// Optional: only store frames with these addresses
    #[serde(default)]
    pub address_filter: Option<Vec<u32>>,
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_MS
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            format: LineFormat::default(),
            refresh_ms: default_refresh_ms(),
            address_filter: None,
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the input grammar
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method: set the refresh interval
    pub fn with_refresh_ms(mut self, refresh_ms: u64) -> Self {
        self.refresh_ms = refresh_ms;
        self
    }

    /// Builder method: set address filter
    pub fn with_address_filter(mut self, addresses: Vec<u32>) -> Self {
        self.address_filter = Some(addresses);
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Check if frames for an address should be stored
    pub fn should_store(&self, address: u32) -> bool {
        match &self.address_filter {
            Some(addresses) => addresses.contains(&address),
            None => true,
        }
    }

    /// Reject settings the loops cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.refresh_ms == 0 {
            return Err(MonitorError::Config(
                "refresh interval must be at least 1 ms".to_string(),
            ));
        }
        if matches!(&self.address_filter, Some(a) if a.is_empty()) {
            return Err(MonitorError::Config(
                "address filter is empty; nothing would be stored".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_config_builder() {
        let config = MonitorConfig::new()
            .with_format(LineFormat::Compact)
            .with_refresh_ms(100)
            .with_address_filter(vec![0x0a194005]);

        assert_eq!(config.format, LineFormat::Compact);
        assert_eq!(config.refresh_interval(), Duration::from_millis(100));
        assert!(config.should_store(0x0a194005));
        assert!(!config.should_store(0x123));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_filter() {
        let config = MonitorConfig::new();
        assert!(config.should_store(0));
        assert!(config.should_store(0xFFFFFFFF));
        assert_eq!(config.format, LineFormat::Auto);
        assert_eq!(config.refresh_ms, 50);
    }

    #[test]
    fn test_validate() {
        assert!(MonitorConfig::new().with_refresh_ms(0).validate().is_err());
        assert!(MonitorConfig::new().with_address_filter(vec![]).validate().is_err());
    }
}
