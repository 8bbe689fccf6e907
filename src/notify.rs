//! Notification sinks.

use tracing::{info, warn};

use crate::quest::{NotificationSink, Severity};

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn show(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Warning => warn!(severity = severity.as_str(), "{}", message),
            _ => info!(severity = severity.as_str(), "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Keeps every notification in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub shown: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.shown.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Notification> {
        self.shown.iter().filter(move |n| n.severity == severity)
    }
}

impl NotificationSink for RecordingNotifier {
    fn show(&mut self, message: &str, severity: Severity) {
        self.shown.push(Notification {
            message: message.to_string(),
            severity,
        });
    }
}
