//! Reporting port
//!
//! The pipeline computes what to report; rendering is owned by an injected
//! collaborator. This module defines that boundary plus two in-crate
//! implementations: `NullReporter` (discard everything) and
//! `RecordingReporter` (capture for assertions and JSON export).

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Log level for reporter calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

/// Leveled logging and hierarchical printing consumed by the pipeline
pub trait Reporter {
    fn log(&self, level: Level, message: &str);

    /// Print a titled list of items (hierarchical printer)
    fn list(&self, title: &str, items: &[String]);

    /// Export the captured log as JSON, if this reporter records anything
    fn export_json(&self) -> Option<String> {
        None
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.log(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn log(&self, _level: Level, _message: &str) {}

    fn list(&self, _title: &str, _items: &[String]) {}
}

/// One captured log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Reporter that records every call
///
/// Uses `Arc<Mutex<_>>` internally so it can be cloned and shared with a
/// pipeline while the caller keeps a handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    lists: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured log entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Messages captured at a given level
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Whether any captured message contains the given fragment
    pub fn saw(&self, fragment: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.message.contains(fragment))
    }

    /// Captured list calls, in order
    pub fn lists(&self) -> Vec<(String, Vec<String>)> {
        self.lists.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, level: Level, message: &str) {
        self.entries.lock().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }

    fn list(&self, title: &str, items: &[String]) {
        self.lists
            .lock()
            .unwrap()
            .push((title.to_string(), items.to_vec()));
    }

    fn export_json(&self) -> Option<String> {
        serde_json::to_string_pretty(&*self.entries.lock().unwrap()).ok()
    }
}
