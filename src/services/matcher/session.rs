//! Per-scan-pass context for the learning protocol.
//!
//! Replaces the ambient prompted/skipped sets the in-page script used to
//! keep: one disposable `ScanSession` per scan pass, passed explicitly to
//! the learning flow so a label is never prompted twice within a pass.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ScanSession {
    prompted: HashSet<String>,
    skipped: HashSet<String>,
    filled: HashMap<String, String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the user was asked about a label. Returns false if it
    /// was already prompted this pass.
    pub fn mark_prompted(&mut self, label: &str) -> bool {
        self.prompted.insert(label.to_string())
    }

    pub fn was_prompted(&self, label: &str) -> bool {
        self.prompted.contains(label)
    }

    /// Record that the user declined to map a label; no further attempts
    /// for the remainder of the pass.
    pub fn mark_skipped(&mut self, label: &str) {
        self.skipped.insert(label.to_string());
    }

    pub fn was_skipped(&self, label: &str) -> bool {
        self.skipped.contains(label)
    }

    /// Record the value last autofilled for a label.
    pub fn record_fill(&mut self, label: &str, value: &str) {
        self.filled.insert(label.to_string(), value.to_string());
    }

    pub fn last_filled(&self, label: &str) -> Option<&str> {
        self.filled.get(label).map(|s| s.as_str())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
