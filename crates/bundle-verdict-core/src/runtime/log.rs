// crates/bundle-verdict-core/src/runtime/log.rs
// ============================================================================
// Module: Bundle Verdict Log Sinks
// Description: JSON-lines sinks for analysis log events.
// Purpose: Emit structured analysis logs without hard dependencies.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! Sinks serialize [`AnalysisLogEvent`] records as one JSON object per line.
//! Write failures are swallowed; logging never changes analysis results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::interfaces::AnalysisLogEvent;
use crate::interfaces::AnalysisLogSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Log sink that writes JSON lines to stderr.
pub struct StderrLogSink;

impl AnalysisLogSink for StderrLogSink {
    fn record(&self, event: &AnalysisLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Log sink that appends JSON lines to a file.
pub struct FileLogSink {
    /// Shared file handle.
    file: Mutex<std::fs::File>,
}

impl FileLogSink {
    /// Opens (or creates) the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AnalysisLogSink for FileLogSink {
    fn record(&self, event: &AnalysisLogEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Log sink that drops every event.
pub struct NoopLogSink;

impl AnalysisLogSink for NoopLogSink {
    fn record(&self, _event: &AnalysisLogEvent) {}
}

/// Log sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryLogSink {
    /// Captured events.
    events: Mutex<Vec<AnalysisLogEvent>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of captured events.
    #[must_use]
    pub fn events(&self) -> Vec<AnalysisLogEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns captured event identifiers in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl AnalysisLogSink for MemoryLogSink {
    fn record(&self, event: &AnalysisLogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<T: AnalysisLogSink + ?Sized> AnalysisLogSink for Box<T> {
    fn record(&self, event: &AnalysisLogEvent) {
        (**self).record(event);
    }
}

impl<T: AnalysisLogSink + ?Sized> AnalysisLogSink for std::sync::Arc<T> {
    fn record(&self, event: &AnalysisLogEvent) {
        (**self).record(event);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
