//! Upload orchestration
//!
//! Drives one submit -> wait -> fetch cycle against an `OcrApi`, reporting
//! progress through a `StatusSink` and always ending in a `WorkflowOutcome`.

use crate::config::ClientConfig;
use crate::debug_logger::DebugLogger;
use crate::error::{ApiError, WorkflowError};
use crate::ocr_client::OcrApi;
use crate::state::WorkflowPhase;
use crate::status_sink::StatusSink;
use crate::types::{Phase, SourceFile, WorkflowOutcome, STATUS_PROCESSING, STATUS_UPLOADING};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Deadlines and the fixed wait used by one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTimings {
    pub upload_timeout: Duration,
    pub processing_delay: Duration,
    pub result_timeout: Duration,
}

impl Default for WorkflowTimings {
    fn default() -> Self {
        Self {
            upload_timeout: Duration::from_secs(100),
            processing_delay: Duration::from_millis(3000),
            result_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ClientConfig> for WorkflowTimings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            upload_timeout: config.upload_timeout(),
            processing_delay: config.processing_delay(),
            result_timeout: config.result_timeout(),
        }
    }
}

/// Tracks the phase of one run and reports each transition
struct Progress<'a> {
    phase: WorkflowPhase,
    sink: &'a dyn StatusSink,
}

impl<'a> Progress<'a> {
    fn new(sink: &'a dyn StatusSink) -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            sink,
        }
    }

    fn advance(&mut self, next: WorkflowPhase) {
        if !self.phase.can_advance_to(&next) {
            tracing::warn!(from = ?self.phase, to = ?next, "Ignoring out-of-order phase transition");
            return;
        }
        tracing::debug!(phase = ?next, "Phase transition");
        self.phase = next;
        self.sink.phase_changed(&self.phase);
    }

    fn finish(&mut self, outcome: &WorkflowOutcome) {
        let terminal = if outcome.is_success() {
            WorkflowPhase::Succeeded
        } else {
            WorkflowPhase::Failed { kind: outcome.kind() }
        };
        self.advance(terminal);
    }
}

/// Run `call` under its own deadline.
///
/// The timer lives inside the `Timeout` future and is dropped with it, so it
/// is released whether the call finishes, fails or runs out of time.
async fn with_deadline<T, F>(
    phase: Phase,
    limit: Duration,
    call: F,
    wrap: fn(ApiError) -> WorkflowError,
) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(wrap),
        Err(_) => Err(WorkflowError::DeadlineExceeded(phase)),
    }
}

/// Drives the submit-then-poll workflow
pub struct UploadOrchestrator<A> {
    api: A,
    timings: WorkflowTimings,
    logger: Arc<DebugLogger>,
}

impl<A: OcrApi> UploadOrchestrator<A> {
    pub fn new(api: A, timings: WorkflowTimings) -> Self {
        Self::with_logger(api, timings, Arc::new(DebugLogger::new()))
    }

    pub fn with_logger(api: A, timings: WorkflowTimings, logger: Arc<DebugLogger>) -> Self {
        Self {
            api,
            timings,
            logger,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn timings(&self) -> WorkflowTimings {
        self.timings
    }

    /// Run one full cycle for `file`.
    ///
    /// Never fails: every error path is reported to `sink` and returned as a
    /// `WorkflowOutcome`. Not reentrant; callers serialize runs (see
    /// `UploadPanel`).
    pub async fn run(&self, file: Option<SourceFile>, sink: &dyn StatusSink) -> WorkflowOutcome {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("ocr_run", %run_id);
        self.run_inner(file, sink).instrument(span).await
    }

    async fn run_inner(&self, file: Option<SourceFile>, sink: &dyn StatusSink) -> WorkflowOutcome {
        sink.clear();
        let mut progress = Progress::new(sink);

        let outcome = match file {
            None => {
                self.logger.warn("Upload requested with no file selected".to_string());
                WorkflowOutcome::NoFileSelected
            }
            Some(file) => match self.submit_and_fetch(file, sink, &mut progress).await {
                Ok(text) => {
                    sink.set_result(&text);
                    WorkflowOutcome::Success { text }
                }
                Err(e) => {
                    self.logger.error(format!("OCR workflow failed: {}", e));
                    WorkflowOutcome::from(e)
                }
            },
        };

        sink.set_status(&outcome.status_message());
        progress.finish(&outcome);
        self.logger.record_outcome(&outcome);

        outcome
    }

    async fn submit_and_fetch(
        &self,
        file: SourceFile,
        sink: &dyn StatusSink,
        progress: &mut Progress<'_>,
    ) -> Result<String, WorkflowError> {
        self.logger.info(format!(
            "Uploading {} ({} bytes)...",
            file.filename,
            file.contents.len()
        ));
        progress.advance(WorkflowPhase::Uploading);
        sink.set_status(STATUS_UPLOADING);

        let task = with_deadline(
            Phase::Upload,
            self.timings.upload_timeout,
            self.api.upload(file),
            WorkflowError::Upload,
        )
        .await?;

        self.logger.info(format!(
            "Uploaded {} as task {}, waiting {}ms before fetching the result",
            task.filename,
            task.task_id,
            self.timings.processing_delay.as_millis()
        ));
        sink.set_status(STATUS_PROCESSING);
        progress.advance(WorkflowPhase::Waiting { task_id: task.task_id.clone() });

        tokio::time::sleep(self.timings.processing_delay).await;

        progress.advance(WorkflowPhase::FetchingResult { task_id: task.task_id.clone() });
        let text = with_deadline(
            Phase::FetchResult,
            self.timings.result_timeout,
            self.api.fetch_result(&task.task_id),
            WorkflowError::FetchResult,
        )
        .await?;

        self.logger.info(format!(
            "OCR result for task {} received ({} chars)",
            task.task_id,
            text.chars().count()
        ));

        Ok(text)
    }
}
