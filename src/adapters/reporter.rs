use crate::domain::ports::{MessageLevel, ProgressReporter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Emits progress as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingReporter {
    total: AtomicUsize,
    position: AtomicUsize,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for TracingReporter {
    fn start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.position.store(0, Ordering::Relaxed);
        tracing::debug!("Cloning {} datasets", total);
    }

    fn set_label(&self, label: &str) {
        tracing::debug!("{}", label);
    }

    fn advance(&self) {
        let position = self.position.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            "Progress {}/{}",
            position,
            self.total.load(Ordering::Relaxed)
        );
    }

    fn message(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Info => tracing::info!("{}", text),
            MessageLevel::Warning => tracing::warn!("{}", text),
            MessageLevel::Error => tracing::error!("{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Start(usize),
    Label(String),
    Advance,
    Message(MessageLevel, String),
}

/// Keeps every progress event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn messages(&self, level: MessageLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Message(l, text) if l == level => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn advances(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ProgressEvent::Advance))
            .count()
    }
}

impl ProgressReporter for RecordingReporter {
    fn start(&self, total: usize) {
        self.record(ProgressEvent::Start(total));
    }

    fn set_label(&self, label: &str) {
        self.record(ProgressEvent::Label(label.to_string()));
    }

    fn advance(&self) {
        self.record(ProgressEvent::Advance);
    }

    fn message(&self, level: MessageLevel, text: &str) {
        self.record(ProgressEvent::Message(level, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_filters_by_level() {
        let reporter = RecordingReporter::new();
        reporter.start(2);
        reporter.info("Cloned Table Owners");
        reporter.warning("skipped");
        reporter.advance();

        assert_eq!(reporter.messages(MessageLevel::Warning), vec!["skipped"]);
        assert_eq!(reporter.advances(), 1);
        assert_eq!(reporter.events()[0], ProgressEvent::Start(2));
    }

    #[test]
    fn test_tracing_reporter_tracks_position() {
        let reporter = TracingReporter::new();
        reporter.start(3);
        reporter.advance();
        reporter.advance();
        assert_eq!(reporter.position(), 2);
    }
}
