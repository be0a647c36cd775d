//! Display sinks the upload workflow reports through.
//!
//! The workflow never owns its display. It is handed a `StatusSink` and only
//! writes to it: a transient status line, the final extracted text, and
//! (optionally) phase transitions.

use crate::state::WorkflowPhase;
use std::io::Write;
use std::sync::Mutex;

/// Write-only display with a status slot and a result slot
pub trait StatusSink: Send + Sync {
    fn set_status(&self, message: &str);

    fn set_result(&self, text: &str);

    /// Called on every state machine transition
    fn phase_changed(&self, _phase: &WorkflowPhase) {}

    /// Blank both slots
    fn clear(&self) {
        self.set_status("");
        self.set_result("");
    }
}

/// Snapshot of what a `MemorySink` has displayed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub status: String,
    pub result: String,
    /// Every status line written, in order, including clears
    pub status_history: Vec<String>,
    /// Number of writes to the result slot, including clears
    pub result_writes: usize,
    pub phases: Vec<WorkflowPhase>,
}

/// Sink that keeps everything in memory, for embedding UIs and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<DisplayState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StatusSink for MemorySink {
    fn set_status(&self, message: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.status = message.to_string();
        state.status_history.push(message.to_string());
    }

    fn set_result(&self, text: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.result = text.to_string();
        state.result_writes += 1;
    }

    fn phase_changed(&self, phase: &WorkflowPhase) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.phases.push(phase.clone());
    }
}

/// Terminal display: status lines on stderr, extracted text on stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn set_status(&self, message: &str) {
        // Blank statuses are clears; nothing to erase on a terminal
        if !message.is_empty() {
            eprintln!("{}", message);
        }
    }

    fn set_result(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = write_result(&mut std::io::stdout().lock(), text) {
            tracing::warn!(error = %e, "Failed to write OCR text to stdout");
        }
    }
}

fn write_result<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    writeln!(out, "{}", text)?;
    out.flush()
}
