//! Client configuration
//!
//! Precedence, lowest first: built-in defaults, `config.json` in the config
//! directory, the compile-time `SMART_OCR_API_HOST`, runtime environment
//! variables.

use crate::config_utils;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_HOST: &str = "http://127.0.0.1:8000";

pub const ENV_API_HOST: &str = "SMART_OCR_API_HOST";
pub const ENV_UPLOAD_TIMEOUT_MS: &str = "SMART_OCR_UPLOAD_TIMEOUT_MS";
pub const ENV_PROCESSING_DELAY_MS: &str = "SMART_OCR_PROCESSING_DELAY_MS";
pub const ENV_RESULT_TIMEOUT_MS: &str = "SMART_OCR_RESULT_TIMEOUT_MS";
pub const ENV_DEBUG_REPORT: &str = "SMART_OCR_DEBUG_REPORT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub upload_timeout_ms: u64,
    pub processing_delay_ms: u64,
    pub result_timeout_ms: u64,
    /// Write a JSON debug report when a run does not succeed
    pub save_debug_report: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_HOST.to_string(),
            upload_timeout_ms: 100_000,
            processing_delay_ms: 3_000,
            result_timeout_ms: 10_000,
            save_debug_report: false,
        }
    }
}

impl ClientConfig {
    /// Load from the user's config directory and the process environment
    pub fn load() -> Result<Self, String> {
        let var = |key: &str| env::var(key).ok();
        match config_utils::config_file_path(CONFIG_FILE) {
            Ok(path) => Self::load_from(&path, var),
            Err(e) => {
                tracing::warn!(error = %e, "No config directory, using defaults");
                Self::layered(Self::default(), var)
            }
        }
    }

    /// Load from `path` (if present), then apply overrides looked up through `var`.
    ///
    /// A config file that can't be read, or whose values fail validation, is
    /// skipped with a warning; the environment still applies on top of the
    /// defaults.
    pub fn load_from<F>(path: &Path, var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = match config_utils::load_json_file::<Self>(path) {
            Ok(Some(config)) => config,
            Ok(None) => return Self::layered(Self::default(), var),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                return Self::layered(Self::default(), var);
            }
        };

        Self::layered(from_file, &var).or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
            Self::layered(Self::default(), &var)
        })
    }

    fn layered<F>(mut config: Self, var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = option_env!("SMART_OCR_API_HOST") {
            config.base_url = host.to_string();
        }
        config.apply_overrides(var);
        config.validate()?;

        Ok(config)
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var(ENV_API_HOST).filter(|h| !h.trim().is_empty()) {
            self.base_url = host;
        }

        let millis = |key: &str, current: u64| match var(key) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "Ignoring non-numeric override");
                current
            }),
            None => current,
        };
        self.upload_timeout_ms = millis(ENV_UPLOAD_TIMEOUT_MS, self.upload_timeout_ms);
        self.processing_delay_ms = millis(ENV_PROCESSING_DELAY_MS, self.processing_delay_ms);
        self.result_timeout_ms = millis(ENV_RESULT_TIMEOUT_MS, self.result_timeout_ms);

        if let Some(flag) = var(ENV_DEBUG_REPORT) {
            self.save_debug_report = matches!(flag.trim(), "1" | "true" | "yes");
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base URL '{}': {}", self.base_url, e))?;
        if url.cannot_be_a_base() {
            return Err(format!("Invalid base URL '{}'", self.base_url));
        }
        if self.upload_timeout_ms == 0 {
            return Err("upload_timeout_ms must be greater than zero".to_string());
        }
        if self.result_timeout_ms == 0 {
            return Err("result_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn result_timeout(&self) -> Duration {
        Duration::from_millis(self.result_timeout_ms)
    }
}
