//! Upload panel: the trigger surface a UI binds its "upload" action to.
//!
//! Holds the currently selected file and the shared display, and makes sure
//! only one run is in flight at a time.

use crate::ocr_client::OcrApi;
use crate::orchestrator::UploadOrchestrator;
use crate::status_sink::StatusSink;
use crate::types::{SourceFile, WorkflowOutcome};
use std::sync::{Arc, Mutex};

pub struct UploadPanel<A> {
    orchestrator: Arc<UploadOrchestrator<A>>,
    sink: Arc<dyn StatusSink>,
    /// File picked by the user; kept after a run so it can be resubmitted
    selected: Mutex<Option<SourceFile>>,
    last_outcome: Mutex<Option<WorkflowOutcome>>,
    /// Held for the whole duration of a run
    in_flight: tokio::sync::Mutex<()>,
}

impl<A: OcrApi> UploadPanel<A> {
    pub fn new(orchestrator: Arc<UploadOrchestrator<A>>, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            orchestrator,
            sink,
            selected: Mutex::new(None),
            last_outcome: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn select_file(&self, file: SourceFile) {
        let mut selected = self.selected.lock().unwrap_or_else(|e| e.into_inner());
        *selected = Some(file);
    }

    pub fn clear_selection(&self) {
        let mut selected = self.selected.lock().unwrap_or_else(|e| e.into_inner());
        *selected = None;
    }

    pub fn selected_filename(&self) -> Option<String> {
        self.selected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|f| f.filename.clone())
    }

    /// Whether a run is in progress; UIs disable their trigger while true
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub fn last_outcome(&self) -> Option<WorkflowOutcome> {
        self.last_outcome.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Run the workflow on the current selection.
    ///
    /// Returns `None` without touching the display if another run is still
    /// in flight.
    pub async fn upload_selected(&self) -> Option<WorkflowOutcome> {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("Upload already in progress, ignoring trigger");
                return None;
            }
        };

        // Clone so the selection survives for a manual retry
        let file = self.selected.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let outcome = self.orchestrator.run(file, self.sink.as_ref()).await;

        let mut last = self.last_outcome.lock().unwrap_or_else(|e| e.into_inner());
        *last = Some(outcome.clone());

        Some(outcome)
    }
}
