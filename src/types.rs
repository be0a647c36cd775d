//! Core types for a single OCR submission.
//!
//! This module contains the file being submitted, the task handle the
//! server assigns to it, and the terminal outcome of one workflow run.

use std::path::Path;

/// A document selected for OCR
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub filename: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl SourceFile {
    /// Build a source file from in-memory bytes, guessing the MIME type from the name
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self {
            filename,
            mime_type,
            contents,
        }
    }

    /// Read a source file from disk
    pub async fn from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read file: {}", e))?;

        let filename = path.file_name()
            .and_then(|n| n.to_str())
            .ok_or("Invalid filename")?
            .to_string();

        Ok(Self::new(filename, contents))
    }
}

/// Handle for one OCR job, created when the upload is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTask {
    pub task_id: String,
    pub filename: String,
}

/// Network phase that can run out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Upload,
    FetchResult,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::FetchResult => f.write_str("fetch_result"),
        }
    }
}

pub const STATUS_NO_FILE: &str = "❌ Please select a file.";
pub const STATUS_UPLOADING: &str = "📤 Uploading file...";
pub const STATUS_PROCESSING: &str = "✅ File uploaded! Processing OCR...";
pub const STATUS_COMPLETED: &str = "✅ OCR processing completed!";
pub const STATUS_TIMED_OUT: &str = "⏱️ Request timed out. Please try again.";
pub const STATUS_UNEXPECTED: &str = "❌ An error occurred while uploading or fetching the result.";

/// Terminal state of one workflow run
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    Success { text: String },
    NoFileSelected,
    UploadFailed { message: String },
    ResultFailed { message: String },
    TimedOut { phase: Phase },
    Unexpected { message: String },
}

/// Discriminant of a `WorkflowOutcome`, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    NoFileSelected,
    UploadFailed,
    ResultFailed,
    TimedOut,
    Unexpected,
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Success { .. })
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            WorkflowOutcome::Success { .. } => OutcomeKind::Success,
            WorkflowOutcome::NoFileSelected => OutcomeKind::NoFileSelected,
            WorkflowOutcome::UploadFailed { .. } => OutcomeKind::UploadFailed,
            WorkflowOutcome::ResultFailed { .. } => OutcomeKind::ResultFailed,
            WorkflowOutcome::TimedOut { .. } => OutcomeKind::TimedOut,
            WorkflowOutcome::Unexpected { .. } => OutcomeKind::Unexpected,
        }
    }

    /// Human-readable status line shown once the run is over.
    ///
    /// `Unexpected` carries a diagnostic message for logs; the user only
    /// sees the generic failure line.
    pub fn status_message(&self) -> String {
        match self {
            WorkflowOutcome::Success { .. } => STATUS_COMPLETED.to_string(),
            WorkflowOutcome::NoFileSelected => STATUS_NO_FILE.to_string(),
            WorkflowOutcome::UploadFailed { message } => format!("❌ Upload failed: {}", message),
            WorkflowOutcome::ResultFailed { message } => {
                format!("❌ Failed to fetch OCR result: {}", message)
            }
            WorkflowOutcome::TimedOut { .. } => STATUS_TIMED_OUT.to_string(),
            WorkflowOutcome::Unexpected { .. } => STATUS_UNEXPECTED.to_string(),
        }
    }
}
