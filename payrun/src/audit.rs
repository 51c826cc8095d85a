//! Append-only audit trail for one workflow run.
//!
//! # Separation of Concerns
//!
//! - **Audit log (this module)**: the product artifact of a run. Recorded
//!   as data on `WorkflowState`; the engine never prints it. Callers
//!   decide whether and where to render [`AuditLog::lines`].
//!
//! - **Tracing (`logging`)**: dev diagnostics via `RUST_LOG`, output to
//!   stderr. Not part of the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// One timestamped audit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl AuditEntry {
    /// Render as `"{timestamp} | {message}"` with second precision.
    pub fn line(&self) -> String {
        format!("{} | {}", self.timestamp.format("%Y-%m-%dT%H:%M:%S"), self.message)
    }
}

/// Ordered, append-only record of every Thought/Action/Observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Append a message stamped with the clock's current time.
    pub fn append(&mut self, clock: &dyn Clock, message: impl Into<String>) {
        self.entries.push(AuditEntry {
            timestamp: clock.now(),
            message: message.into(),
        });
    }

    /// Whether any entry's message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.message.contains(needle))
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Render all entries as timestamped lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(AuditEntry::line).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
