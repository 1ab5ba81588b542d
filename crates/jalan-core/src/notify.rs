//! Notification sink interface.
//!
//! Fire-and-forget advisories for the UI layer. The core functions
//! correctly when the sink is a no-op; nothing here is load-bearing.

use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A user-facing advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Consumer of notifications, typically the UI toast layer.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that drops everything.
#[derive(Debug, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _notification: Notification) {}
}

/// Sink that forwards notifications to the tracing pipeline.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Warning | Severity::Error => tracing::warn!(
                severity = %notification.severity,
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            _ => tracing::info!(
                severity = %notification.severity,
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_anything() {
        let sink = NoopSink;
        sink.notify(Notification::new("Judul", "Deskripsi", Severity::Error));
    }

    #[test]
    fn tracing_sink_accepts_all_severities() {
        let sink = TracingSink;
        for severity in [Severity::Info, Severity::Success, Severity::Warning, Severity::Error] {
            sink.notify(Notification::new("Judul", "Deskripsi", severity));
        }
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
