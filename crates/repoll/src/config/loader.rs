//! Configuration file loading and environment overrides
//!
//! Precedence (low to high):
//! 1. Built-in defaults
//! 2. Configuration file (YAML, or JSON when the extension is `.json`)
//! 3. Environment variables (`REPOLL_*` prefix)
//! 4. Setter calls on the `Poller` (handled by the caller)

use camino::Utf8Path;
use std::env;
use std::fs;
use std::str::FromStr;

use super::types::{BackoffConfig, PollerConfig};
use crate::error::{Error, Result};

impl PollerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: PollerConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: PollerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// Files ending in `.json` are parsed as JSON; anything else as YAML.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let config = match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };

        tracing::debug!(path = %path, "loaded poller configuration");
        Ok(config)
    }

    /// Apply `REPOLL_*` environment variable overrides and re-validate
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Some(val) = parse_env::<u64>("REPOLL_TIMEOUT_MS")? {
            self.timeout_ms = val;
        }

        if let Some(val) = parse_env::<u64>("REPOLL_INTERVAL_MS")? {
            self.interval_ms = val;
        }

        if let Some(val) = parse_env::<u32>("REPOLL_MAX_ATTEMPTS")? {
            self.max_attempts = Some(val);
        }

        if let Some(val) = parse_env::<f64>("REPOLL_BACKOFF_MULTIPLIER")? {
            self.backoff.get_or_insert_with(BackoffConfig::default).multiplier = val;
        }

        if let Some(val) = parse_env::<u64>("REPOLL_BACKOFF_MAX_INTERVAL_MS")? {
            self.backoff
                .get_or_insert_with(BackoffConfig::default)
                .max_interval_ms = Some(val);
        }

        if let Ok(val) = env::var("REPOLL_MESSAGE") {
            self.message = Some(val);
        }

        self.validate()?;
        Ok(self)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", name))),
        Err(_) => Ok(None),
    }
}
