use std::time::Instant;

use kiln_diagnostics::DiagnosticSink;
use kiln_toolchain::{Compiler, Console, Diagnostic, Loader};
use tokio_util::sync::CancellationToken;

use crate::timings::PhaseTimings;
use crate::{CompilationPipeline, CompilationResult, ExecutionEngine, ExecutionOutcome, FetchError};

/// How a run request ended.
#[derive(Debug)]
pub enum RunOutcome {
	/// Cancelled before the entry routine was invoked.
	Cancelled,
	/// A reference could not be obtained; nothing was compiled.
	FetchFailed(FetchError),
	/// Compilation produced no image; nothing was executed.
	CompileFailed(Vec<Diagnostic>),
	Executed(ExecutionOutcome),
}

impl RunOutcome {
	/// True only when the entry routine ran to completion.
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Executed(ExecutionOutcome::Completed))
	}
}

/// Result of one run request.
#[derive(Debug)]
pub struct RunReport {
	pub outcome: RunOutcome,
	/// Console lines written by the invoked program.
	pub console: Vec<String>,
	pub timings: PhaseTimings,
}

/// Compiles and executes source text, one request at a time.
///
/// Holds the reference list every request compiles against.
pub struct Runner<C, L> {
	pipeline: CompilationPipeline<C>,
	engine: ExecutionEngine<L>,
	references: Vec<String>,
	sink: DiagnosticSink,
}

impl<C: Compiler + 'static, L: Loader> Runner<C, L> {
	pub fn new(pipeline: CompilationPipeline<C>, engine: ExecutionEngine<L>, references: Vec<String>, sink: DiagnosticSink) -> Self {
		Self {
			pipeline,
			engine,
			references,
			sink,
		}
	}

	/// Compiles `source` and runs its entry routine.
	///
	/// `cancel` is honored until the entry routine is invoked: a cancelled
	/// request stops fetching or compiling and never executes. An invocation
	/// that already started runs to completion.
	pub async fn run(&self, source: &str, cancel: &CancellationToken) -> RunReport {
		let console = Console::new();
		let mut timings = PhaseTimings::default();

		if cancel.is_cancelled() {
			return self.cancelled(console, timings);
		}

		let compiled = tokio::select! {
			biased;
			_ = cancel.cancelled() => None,
			compiled = self.pipeline.compile(source, &self.references) => Some(compiled),
		};

		let Some(compiled) = compiled else {
			return self.cancelled(console, timings);
		};
		timings = compiled.timings;

		let image = match compiled.result {
			Ok(CompilationResult::Success(image)) => image,
			Ok(CompilationResult::Failure(diagnostics)) => return Self::finish(RunOutcome::CompileFailed(diagnostics), console, timings),
			Err(err) => return Self::finish(RunOutcome::FetchFailed(err), console, timings),
		};

		let prepared = match self.engine.prepare(&image) {
			Ok(prepared) => prepared,
			Err(outcome) => return Self::finish(RunOutcome::Executed(outcome), console, timings),
		};

		if cancel.is_cancelled() {
			return self.cancelled(console, timings);
		}

		let started = Instant::now();
		let outcome = self.engine.invoke(prepared, &console).await;
		timings.invoke = Some(started.elapsed());

		Self::finish(RunOutcome::Executed(outcome), console, timings)
	}

	fn cancelled(&self, console: Console, timings: PhaseTimings) -> RunReport {
		self.sink.warning("Request cancelled before execution");
		Self::finish(RunOutcome::Cancelled, console, timings)
	}

	fn finish(outcome: RunOutcome, console: Console, timings: PhaseTimings) -> RunReport {
		RunReport {
			outcome,
			console: console.lines(),
			timings,
		}
	}
}
