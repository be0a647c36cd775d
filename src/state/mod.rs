//! Workflow state management.
//!
//! This module contains the phase type for one upload run and the panel
//! that serializes runs triggered from a UI.

mod app_state;
mod manager;

pub use app_state::WorkflowPhase;
pub use manager::UploadPanel;
