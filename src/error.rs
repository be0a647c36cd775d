//! Error types for the OCR service client and the upload workflow.

use thiserror::Error;

use crate::types::{Phase, WorkflowOutcome};

/// Failure talking to the OCR service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is the server's `error` field or the generic fallback
    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the transport gave up because of a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }
}

/// Failure of one workflow run, before it is turned into an outcome
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0} phase exceeded its deadline")]
    DeadlineExceeded(Phase),

    #[error("upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("result fetch failed: {0}")]
    FetchResult(#[source] ApiError),
}

impl WorkflowError {
    pub fn phase(&self) -> Phase {
        match self {
            WorkflowError::DeadlineExceeded(phase) => *phase,
            WorkflowError::Upload(_) => Phase::Upload,
            WorkflowError::FetchResult(_) => Phase::FetchResult,
        }
    }
}

impl From<WorkflowError> for WorkflowOutcome {
    fn from(error: WorkflowError) -> Self {
        let phase = error.phase();
        match error {
            WorkflowError::DeadlineExceeded(phase) => WorkflowOutcome::TimedOut { phase },
            WorkflowError::Upload(ApiError::Rejected { message, .. }) => {
                WorkflowOutcome::UploadFailed { message }
            }
            WorkflowError::FetchResult(ApiError::Rejected { message, .. }) => {
                WorkflowOutcome::ResultFailed { message }
            }
            WorkflowError::Upload(e) | WorkflowError::FetchResult(e) if e.is_timeout() => {
                WorkflowOutcome::TimedOut { phase }
            }
            WorkflowError::Upload(e) | WorkflowError::FetchResult(e) => {
                WorkflowOutcome::Unexpected { message: e.to_string() }
            }
        }
    }
}
