use std::sync::Mutex;

/// Category of a console status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Success,
    Warning,
    Error,
    /// Banner rules and titles
    Heading,
    /// Unadorned text
    Plain,
}

/// Sink for the human-readable run output
///
/// Only `emit` is required; the helpers keep call sites short.
pub trait Reporter: Send + Sync {
    fn emit(&self, level: ReportLevel, message: &str);

    fn info(&self, message: &str) {
        self.emit(ReportLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(ReportLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.emit(ReportLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(ReportLevel::Error, message);
    }

    fn heading(&self, message: &str) {
        self.emit(ReportLevel::Heading, message);
    }

    fn line(&self, message: &str) {
        self.emit(ReportLevel::Plain, message);
    }

    fn blank(&self) {
        self.emit(ReportLevel::Plain, "");
    }
}

/// Routes report lines into `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn emit(&self, level: ReportLevel, message: &str) {
        if message.is_empty() {
            return;
        }
        match level {
            ReportLevel::Error => tracing::error!("{}", message),
            ReportLevel::Warning => tracing::warn!("{}", message),
            _ => tracing::info!("{}", message),
        }
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(ReportLevel, String)> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages emitted at `level`, in order
    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// True if any line at any level contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn emit(&self, level: ReportLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_keeps_order_and_levels() {
        let reporter = RecordingReporter::new();
        reporter.info("connecting");
        reporter.success("done");
        reporter.blank();
        reporter.error("boom");

        assert_eq!(
            reporter.lines(),
            vec![
                (ReportLevel::Info, "connecting".to_string()),
                (ReportLevel::Success, "done".to_string()),
                (ReportLevel::Plain, String::new()),
                (ReportLevel::Error, "boom".to_string()),
            ]
        );
        assert_eq!(reporter.messages(ReportLevel::Error), vec!["boom"]);
        assert!(reporter.contains("conn"));
        assert!(!reporter.contains("missing"));
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        let reporter = TracingReporter;
        reporter.warning("heads up");
        reporter.blank();
    }
}
