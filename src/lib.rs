mod api_contracts;
mod config_utils;
mod debug_logger;
mod error;
mod ocr_client;
mod orchestrator;
mod state;
mod status_sink;
mod types;
pub mod config;

#[cfg(test)]
mod test_harness;

pub use config::ClientConfig;
pub use debug_logger::{DebugLogEntry, DebugLogger, DebugReport};
pub use error::{ApiError, WorkflowError};
pub use ocr_client::{OcrApi, OcrServiceClient};
pub use orchestrator::{UploadOrchestrator, WorkflowTimings};
pub use state::{UploadPanel, WorkflowPhase};
pub use status_sink::{ConsoleSink, DisplayState, MemorySink, StatusSink};
pub use types::{OutcomeKind, Phase, SourceFile, SubmissionTask, WorkflowOutcome};

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// Level comes from `RUST_LOG` (default `info`); `SMART_OCR_LOG_FORMAT=json`
/// switches to JSON lines. Output goes to stderr so stdout only carries the
/// extracted text.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("SMART_OCR_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    };
}

/// Console entry point: submit `file` (if any) and display the outcome.
pub async fn run(file: Option<PathBuf>) -> WorkflowOutcome {
    let debug_logger = Arc::new(DebugLogger::new());

    // Only an invalid environment override lands here; file problems are already skipped
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            debug_logger.warn(format!("Invalid configuration, using defaults: {}", e));
            ClientConfig::default()
        }
    };
    debug_logger.info(format!("Using OCR service at {}", config.base_url));

    let client = OcrServiceClient::with_logger(config.base_url.clone(), Some(Arc::clone(&debug_logger)));

    let selected = match file {
        Some(path) => match SourceFile::from_path(&path).await {
            Ok(source) => Some(source),
            Err(e) => {
                debug_logger.error(format!("Could not open {}: {}", path.display(), e));
                None
            }
        },
        None => None,
    };

    // Preflight only; a failing status route does not block the upload
    if selected.is_some() {
        match client.service_status().await {
            Ok(message) => debug_logger.debug(format!("Service status: {}", message)),
            Err(e) => debug_logger.warn(format!("Service status check failed: {}", e)),
        }
    }

    let orchestrator = Arc::new(UploadOrchestrator::with_logger(
        client,
        WorkflowTimings::from(&config),
        Arc::clone(&debug_logger),
    ));
    let panel = UploadPanel::new(orchestrator, Arc::new(ConsoleSink));
    if let Some(source) = selected {
        panel.select_file(source);
    }

    // A fresh panel is never busy
    let outcome = panel
        .upload_selected()
        .await
        .unwrap_or(WorkflowOutcome::Unexpected {
            message: "upload already in progress".to_string(),
        });

    if !outcome.is_success() && config.save_debug_report {
        match debug_logger.save_report_to_file(Some(config.base_url.clone())) {
            Ok(path) => debug_logger.info(format!("Debug report saved to {}", path.display())),
            Err(e) => debug_logger.error(format!("Failed to save debug report: {}", e)),
        }
    }

    outcome
}
