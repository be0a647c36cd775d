//! Workflow phase enum representing the lifecycle of one upload run.

use crate::types::OutcomeKind;

/// The current phase of an upload run
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WorkflowPhase {
    /// Initial state - nothing submitted yet
    Idle,
    /// Multipart upload in flight
    Uploading,
    /// Upload accepted, sleeping before the result fetch
    Waiting { task_id: String },
    /// Result request in flight
    FetchingResult { task_id: String },
    /// Text extracted and displayed
    Succeeded,
    /// Run ended without text
    Failed { kind: OutcomeKind },
}

impl WorkflowPhase {
    fn rank(&self) -> u8 {
        match self {
            WorkflowPhase::Idle => 0,
            WorkflowPhase::Uploading => 1,
            WorkflowPhase::Waiting { .. } => 2,
            WorkflowPhase::FetchingResult { .. } => 3,
            WorkflowPhase::Succeeded | WorkflowPhase::Failed { .. } => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowPhase::Succeeded | WorkflowPhase::Failed { .. })
    }

    /// Transitions only move forward and never leave a terminal phase
    pub fn can_advance_to(&self, next: &WorkflowPhase) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}
