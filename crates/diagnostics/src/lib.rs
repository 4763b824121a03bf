//! Diagnostic sink for the kiln pipeline.
//!
//! Every stage (resolution, fetching, compilation, execution) reports through a
//! shared [`DiagnosticSink`]. The sink is append-only and process-wide: events
//! are numbered in the order they were logged and are never pruned here. Size
//! limits and presentation belong to whoever observes the stream.
//!
//! Observers attach through [`DiagnosticSink::subscribe`]. Delivery to
//! observers is best-effort: a slow observer lags and loses the oldest events
//! instead of stalling the caller of [`DiagnosticSink::log`].

mod severity;
mod sink;

pub use severity::Severity;
pub use sink::{DiagnosticSink, LogEvent, OBSERVER_BUFFER};
