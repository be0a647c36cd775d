use crate::config_utils;
use crate::types::WorkflowOutcome;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugReport {
    pub generated_at: String,
    pub app_version: String,
    pub base_url: Option<String>,
    pub last_outcome: Option<WorkflowOutcome>,
    pub error_count: usize,
    pub log_entries: Vec<DebugLogEntry>,
}

pub struct DebugLogger {
    logs: Arc<Mutex<Vec<DebugLogEntry>>>,
    error_count: Arc<Mutex<usize>>,
    last_outcome: Arc<Mutex<Option<WorkflowOutcome>>>,
}

impl DebugLogger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
            last_outcome: Arc::new(Mutex::new(None)),
        }
    }

    pub fn log(&self, level: &str, message: String, context: Option<serde_json::Value>) {
        match level {
            "ERROR" | "FATAL" => tracing::error!(context = ?context, "{}", message),
            "WARN" => tracing::warn!(context = ?context, "{}", message),
            "DEBUG" => tracing::debug!(context = ?context, "{}", message),
            _ => tracing::info!(context = ?context, "{}", message),
        }

        let entry = DebugLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level.to_string(),
            message,
            context,
        };

        if level == "ERROR" || level == "FATAL" {
            if let Ok(mut count) = self.error_count.lock() {
                *count += 1;
            }
        }

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= MAX_ENTRIES {
                logs.remove(0);
            }
            logs.push(entry);
        }
    }

    pub fn info(&self, message: String) {
        self.log("INFO", message, None);
    }

    pub fn warn(&self, message: String) {
        self.log("WARN", message, None);
    }

    pub fn error(&self, message: String) {
        self.log("ERROR", message, None);
    }

    pub fn debug(&self, message: String) {
        self.log("DEBUG", message, None);
    }

    /// Remember the outcome of the latest run and log it with its payload
    pub fn record_outcome(&self, outcome: &WorkflowOutcome) {
        let context = serde_json::to_value(outcome).ok();
        self.log("INFO", format!("Workflow finished: {:?}", outcome.kind()), context);

        if let Ok(mut last) = self.last_outcome.lock() {
            *last = Some(outcome.clone());
        }
    }

    pub fn last_outcome(&self) -> Option<WorkflowOutcome> {
        self.last_outcome.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn get_error_count(&self) -> usize {
        *self.error_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn entry_count(&self) -> usize {
        self.logs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn generate_report(&self, base_url: Option<String>) -> DebugReport {
        let logs = self.logs.lock().unwrap_or_else(|e| e.into_inner()).clone();

        DebugReport {
            generated_at: Utc::now().to_rfc3339(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            base_url,
            last_outcome: self.last_outcome(),
            error_count: self.get_error_count(),
            log_entries: logs,
        }
    }

    /// Write a report into `logs_dir` and return the file path
    pub fn save_report_to(&self, logs_dir: &Path, base_url: Option<String>) -> Result<PathBuf, String> {
        let report = self.generate_report(base_url);

        fs::create_dir_all(logs_dir)
            .map_err(|e| format!("Failed to create logs directory: {}", e))?;

        // Generate filename with timestamp
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("debug_log_{}.json", timestamp);
        let log_path = logs_dir.join(&filename);

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;

        fs::write(&log_path, json)
            .map_err(|e| format!("Failed to write to log file: {}", e))?;

        Ok(log_path)
    }

    /// Write a report into the user's logs directory (`~/.smart-ocr-client/logs`)
    pub fn save_report_to_file(&self, base_url: Option<String>) -> Result<PathBuf, String> {
        let logs_dir = config_utils::get_logs_dir()?;
        self.save_report_to(&logs_dir, base_url)
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}
