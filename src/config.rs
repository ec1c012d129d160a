// SPDX-License-Identifier: MIT
//! Environment configuration

/// Runtime settings for the codec and the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// zlib level, 0 (store) to 9 (best)
    pub compression_level: u32,
    /// `tracing` filter directive for the CLI
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            compression_level: std::env::var("CUBITS_COMPRESSION_LEVEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(6), // zlib's own default
            log_filter: std::env::var("CUBITS_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.compression_level > 9 {
            return Err("CUBITS_COMPRESSION_LEVEL must be between 0 and 9".to_string());
        }

        if self.log_filter.trim().is_empty() {
            return Err("CUBITS_LOG cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression_level: 6,
            log_filter: "info".to_string(),
        }
    }
}
