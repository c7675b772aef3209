//! Where construction failures go.
//!
//! Failures never reach the host as errors. They are handed to a
//! [`DiagnosticSink`]; the default one logs through `tracing`.

use parking_lot::Mutex;
use tracing::error;

use crate::editor::EditorError;

pub trait DiagnosticSink: Send + Sync {
    fn construction_failed(&self, editor: &str, error: &EditorError);
}

/// Logs failures at ERROR level and mirrors them to the event log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn construction_failed(&self, editor: &str, error: &EditorError) {
        error!(editor, %error, "editor construction failed");
        crate::eventlog::log_event("diagnostic.error", format!("editor={editor} err={error}"));
    }
}

/// One failure captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub editor: String,
    pub message: String,
}

/// Keeps every failure in memory, for hosts that surface them later.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn construction_failed(&self, editor: &str, error: &EditorError) {
        self.records.lock().push(DiagnosticRecord {
            editor: editor.to_string(),
            message: error.to_string(),
        });
    }
}
