//! The kiln compile-resolve-execute pipeline.
//!
//! A request flows through three stages, all reporting to one
//! [`DiagnosticSink`](kiln_diagnostics::DiagnosticSink):
//!
//! 1. [`ReferenceFetcher`] resolves each required reference through the
//!    manifest, downloads it and converts it from wire format.
//! 2. [`CompilationPipeline`] parses the source, compiles it against the
//!    fetched references, logs every diagnostic and emits an image in memory.
//! 3. [`ExecutionEngine`] loads the image, picks the argument shape for the
//!    entry routine, invokes it and turns any fault into an
//!    [`ExecutionOutcome`]. Faults never escape the engine.
//!
//! [`Runner`] composes the stages for one request and honors a cancellation
//! token up to the moment the entry routine is invoked.

mod compile;
mod error;
mod execute;
mod fetch;
mod runner;
mod severity;
mod task;
mod timings;

pub use compile::{Compiled, CompilationPipeline, CompilationResult};
pub use error::FetchError;
pub use execute::{ExecutionEngine, ExecutionOutcome, FaultReport, PreparedInvocation};
pub use fetch::ReferenceFetcher;
pub use runner::{RunOutcome, RunReport, Runner};
pub use severity::map_severity;
pub use task::join_error_panic_message;
pub use timings::PhaseTimings;
