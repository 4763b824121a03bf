use std::sync::Arc;
use std::time::{Duration, Instant};

use kiln_diagnostics::DiagnosticSink;
use kiln_toolchain::{Compilation, CompileOptions, Compiler, Diagnostic, DiagnosticSeverity};

use crate::timings::{PhaseTimings, format_duration};
use crate::{FetchError, ReferenceFetcher, join_error_panic_message, map_severity};

/// Id of the diagnostic synthesized when emission panics.
const EMIT_PANIC: &str = "KILN0001";
/// Id of the diagnostic synthesized when emission fails without reporting an error.
const EMIT_FAILED: &str = "KILN0002";

/// Outcome of compiling one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
	/// The emitted image.
	Success(Vec<u8>),
	/// Diagnostics reported by the failed emission.
	Failure(Vec<Diagnostic>),
}

impl CompilationResult {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}
}

/// A compilation request together with the timings of the phases that ran.
///
/// `result` is an error when a reference could not be obtained; nothing was
/// compiled then, but the parse and fetch timings are still recorded.
#[derive(Debug)]
pub struct Compiled {
	pub result: Result<CompilationResult, FetchError>,
	pub timings: PhaseTimings,
}

/// Parses, compiles and emits source text against fetched references.
pub struct CompilationPipeline<C> {
	compiler: Arc<C>,
	fetcher: ReferenceFetcher,
	sink: DiagnosticSink,
}

impl<C: Compiler + 'static> CompilationPipeline<C> {
	pub fn new(compiler: C, fetcher: ReferenceFetcher, sink: DiagnosticSink) -> Self {
		Self {
			compiler: Arc::new(compiler),
			fetcher,
			sink,
		}
	}

	/// Compiles `source` against `reference_names`.
	///
	/// Every compilation diagnostic is logged before success is decided. A
	/// reference that cannot be obtained aborts the request with an Error
	/// entry and no compilation is attempted.
	pub async fn compile(&self, source: &str, reference_names: &[String]) -> Compiled {
		let mut timings = PhaseTimings::default();

		let started = Instant::now();
		let syntax = self.compiler.parse(source);
		timings.parse = Some(self.phase_done("parse", started));

		let started = Instant::now();
		let fetched = self.fetcher.fetch_all(reference_names).await;
		let fetch_time = started.elapsed();
		timings.fetch = Some(fetch_time);
		let references = match fetched {
			Ok(references) => references,
			Err(err) => {
				self.sink.error(format!("Failed to load reference: {err}"));
				return Compiled { result: Err(err), timings };
			}
		};
		self.sink.debug(format!(
			"fetch of {} references completed in {}",
			references.len(),
			format_duration(fetch_time)
		));

		let started = Instant::now();
		let compilation = self.compiler.compile(syntax, references, &CompileOptions::executable());
		timings.compile = Some(self.phase_done("compile", started));

		for diagnostic in compilation.diagnostics() {
			self.log_diagnostic(&diagnostic);
		}

		let started = Instant::now();
		let emitted = tokio::task::spawn_blocking(move || compilation.emit()).await;
		timings.emit = Some(self.phase_done("emit", started));

		let emit = match emitted {
			Ok(emit) => emit,
			Err(err) => {
				let message = join_error_panic_message(err).unwrap_or_else(|| "emission was cancelled".to_string());
				self.sink.error(format!("Emission failed: {message}"));
				let diagnostic = Diagnostic::new(EMIT_PANIC, DiagnosticSeverity::Error, message);
				return Compiled {
					result: Ok(CompilationResult::Failure(vec![diagnostic])),
					timings,
				};
			}
		};

		let result = if emit.success {
			self.sink.debug(format!("emitted image of {} bytes", emit.bytes.len()));
			CompilationResult::Success(emit.bytes)
		} else {
			let mut diagnostics = emit.diagnostics;
			for diagnostic in &diagnostics {
				self.log_diagnostic(diagnostic);
			}
			if !diagnostics.iter().any(Diagnostic::is_error) {
				let diagnostic = Diagnostic::new(EMIT_FAILED, DiagnosticSeverity::Error, "emission failed without reporting an error");
				self.log_diagnostic(&diagnostic);
				diagnostics.push(diagnostic);
			}
			CompilationResult::Failure(diagnostics)
		};

		Compiled { result: Ok(result), timings }
	}

	fn log_diagnostic(&self, diagnostic: &Diagnostic) {
		self.sink.log(diagnostic.to_string(), map_severity(diagnostic.severity));
	}

	fn phase_done(&self, phase: &str, started: Instant) -> Duration {
		let elapsed = started.elapsed();
		self.sink.debug(format!("{phase} completed in {}", format_duration(elapsed)));
		elapsed
	}
}
