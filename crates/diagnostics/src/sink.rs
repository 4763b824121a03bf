use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::Severity;

/// Capacity of the observer channel. Observers further behind than this lag.
pub const OBSERVER_BUFFER: usize = 1024;

/// A single log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
	/// Position in the sink's stream, starting at zero.
	pub seq: u64,
	pub timestamp: DateTime<Local>,
	pub severity: Severity,
	pub message: String,
}

impl fmt::Display for LogEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] {:<5} {}", self.timestamp.format("%H:%M:%S%.3f"), self.severity, self.message)
	}
}

struct SinkInner {
	events: Mutex<Vec<LogEvent>>,
	observers: broadcast::Sender<LogEvent>,
}

/// Append-only, severity-leveled event log.
///
/// Cheap to clone; clones share one stream.
#[derive(Clone)]
pub struct DiagnosticSink {
	inner: Arc<SinkInner>,
}

impl fmt::Debug for DiagnosticSink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DiagnosticSink").field("len", &self.len()).finish_non_exhaustive()
	}
}

impl Default for DiagnosticSink {
	fn default() -> Self {
		Self::new()
	}
}

impl DiagnosticSink {
	/// Creates an empty sink with no observers.
	pub fn new() -> Self {
		let (observers, _) = broadcast::channel(OBSERVER_BUFFER);
		Self {
			inner: Arc::new(SinkInner {
				events: Mutex::new(Vec::new()),
				observers,
			}),
		}
	}

	/// Appends one event. Never fails and never waits on observers.
	pub fn log(&self, message: impl Into<String>, severity: Severity) {
		let message = message.into();
		{
			let mut events = self.inner.events.lock();
			let event = LogEvent {
				seq: events.len() as u64,
				timestamp: Local::now(),
				severity,
				message: message.clone(),
			};
			// Sent under the lock so observers see the same order as the stream.
			let _ = self.inner.observers.send(event.clone());
			events.push(event);
		}
		mirror_to_tracing(severity, &message);
	}

	pub fn debug(&self, message: impl Into<String>) {
		self.log(message, Severity::Debug);
	}

	pub fn info(&self, message: impl Into<String>) {
		self.log(message, Severity::Info);
	}

	pub fn warning(&self, message: impl Into<String>) {
		self.log(message, Severity::Warning);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.log(message, Severity::Error);
	}

	/// Subscribes to events logged from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
		self.inner.observers.subscribe()
	}

	/// Returns a snapshot of all events in logging order.
	pub fn events(&self) -> Vec<LogEvent> {
		self.inner.events.lock().clone()
	}

	/// Returns the number of events with exactly this severity.
	pub fn count(&self, severity: Severity) -> usize {
		self.inner.events.lock().iter().filter(|event| event.severity == severity).count()
	}

	/// Returns true if an event of this severity contains `needle`.
	pub fn contains(&self, severity: Severity, needle: &str) -> bool {
		self.inner
			.events
			.lock()
			.iter()
			.any(|event| event.severity == severity && event.message.contains(needle))
	}

	pub fn len(&self) -> usize {
		self.inner.events.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.events.lock().is_empty()
	}
}

fn mirror_to_tracing(severity: Severity, message: &str) {
	match severity {
		Severity::Debug => tracing::debug!(target: "kiln::sink", "{message}"),
		Severity::Info => tracing::info!(target: "kiln::sink", "{message}"),
		Severity::Warning => tracing::warn!(target: "kiln::sink", "{message}"),
		Severity::Error => tracing::error!(target: "kiln::sink", "{message}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn events_keep_logging_order() {
		let sink = DiagnosticSink::new();
		sink.info("first");
		sink.error("second");
		sink.debug("third");

		let events = sink.events();
		let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
		assert_eq!(messages, ["first", "second", "third"]);
		assert_eq!(events.iter().map(|e| e.seq).collect::<Vec<_>>(), [0, 1, 2]);
		assert_eq!(events[1].severity, Severity::Error);
	}

	#[test]
	fn clones_share_one_stream() {
		let sink = DiagnosticSink::new();
		let other = sink.clone();
		other.warning("from clone");
		assert_eq!(sink.len(), 1);
		assert!(sink.contains(Severity::Warning, "clone"));
		assert!(!sink.contains(Severity::Error, "clone"));
	}

	#[test]
	fn logging_without_observers_is_fine() {
		let sink = DiagnosticSink::new();
		for i in 0..(OBSERVER_BUFFER * 2) {
			sink.debug(format!("event {i}"));
		}
		assert_eq!(sink.count(Severity::Debug), OBSERVER_BUFFER * 2);
	}

	#[tokio::test]
	async fn observers_receive_events_in_order() {
		let sink = DiagnosticSink::new();
		let mut rx = sink.subscribe();
		sink.info("a");
		sink.error("b");

		let a = rx.recv().await.expect("first event");
		let b = rx.recv().await.expect("second event");
		assert_eq!((a.seq, a.message.as_str()), (0, "a"));
		assert_eq!((b.seq, b.severity), (1, Severity::Error));
	}

	#[tokio::test]
	async fn slow_observer_lags_instead_of_blocking() {
		let sink = DiagnosticSink::new();
		let mut rx = sink.subscribe();
		for i in 0..(OBSERVER_BUFFER + 10) {
			sink.info(format!("event {i}"));
		}
		assert_eq!(sink.len(), OBSERVER_BUFFER + 10);
		assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Lagged(10))));
	}

	#[test]
	fn display_includes_severity_and_message() {
		let sink = DiagnosticSink::new();
		sink.error("boom");
		let rendered = sink.events()[0].to_string();
		assert!(rendered.contains("ERROR"), "got: {rendered}");
		assert!(rendered.ends_with("boom"), "got: {rendered}");
	}
}
