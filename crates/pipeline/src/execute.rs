use std::fmt;
use std::time::Instant;

use kiln_diagnostics::DiagnosticSink;
use kiln_toolchain::{Console, EntryArgs, EntryRoutine, Fault, FaultKind, LoadedUnit, Loader};

use crate::join_error_panic_message;
use crate::timings::format_duration;

/// Type name reported for a panic inside an invoked entry routine.
const PANIC_FAULT: &str = "Panic";

/// A fault that ended an invocation, reduced to what the caller reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
	/// Type name of the reported (innermost) fault.
	pub type_name: String,
	/// The message that was logged: the innermost fault's message.
	pub message: String,
	/// Message of the fault exactly as raised, before unwrapping.
	pub outer_message: String,
	/// True when the reported fault is a not-supported condition.
	pub not_supported: bool,
}

impl FaultReport {
	fn from_fault(fault: &Fault) -> Self {
		let root = fault.root_cause();
		Self {
			type_name: root.type_name.clone(),
			message: root.message.clone(),
			outer_message: fault.message.clone(),
			not_supported: root.kind == FaultKind::NotSupported,
		}
	}

	fn panic(message: String) -> Self {
		Self {
			type_name: PANIC_FAULT.to_string(),
			outer_message: message.clone(),
			message,
			not_supported: false,
		}
	}
}

impl fmt::Display for FaultReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.type_name, self.message)
	}
}

/// How an execution request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
	Completed,
	/// The image declares no entry routine.
	NoEntryPoint,
	/// Loading failed, or the entry routine raised a fault or panicked.
	Faulted(FaultReport),
}

impl ExecutionOutcome {
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Completed)
	}

	pub fn fault(&self) -> Option<&FaultReport> {
		match self {
			Self::Faulted(report) => Some(report),
			_ => None,
		}
	}
}

/// A loaded unit whose entry routine and argument shape are settled.
pub struct PreparedInvocation<U> {
	unit: U,
	entry: EntryRoutine,
	args: EntryArgs,
}

impl<U> PreparedInvocation<U> {
	pub fn entry(&self) -> &EntryRoutine {
		&self.entry
	}

	pub fn args(&self) -> &EntryArgs {
		&self.args
	}
}

impl<U> fmt::Debug for PreparedInvocation<U> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PreparedInvocation")
			.field("entry", &self.entry)
			.field("args", &self.args)
			.finish_non_exhaustive()
	}
}

/// Loads emitted images and runs their entry routine in isolation.
///
/// Nothing raised by the invoked code escapes: faults and panics become
/// [`ExecutionOutcome::Faulted`] with an Error entry in the sink, and the
/// engine stays usable for the next request.
pub struct ExecutionEngine<L> {
	loader: L,
	sink: DiagnosticSink,
}

impl<L: Loader> ExecutionEngine<L> {
	pub fn new(loader: L, sink: DiagnosticSink) -> Self {
		Self { loader, sink }
	}

	/// Loads `image`, then invokes its entry routine.
	pub async fn execute(&self, image: &[u8], console: &Console) -> ExecutionOutcome {
		match self.prepare(image) {
			Ok(prepared) => self.invoke(prepared, console).await,
			Err(outcome) => outcome,
		}
	}

	/// Loads `image` and picks the argument shape for its entry routine.
	///
	/// Returns the final outcome instead when there is nothing to invoke.
	pub fn prepare(&self, image: &[u8]) -> Result<PreparedInvocation<L::Unit>, ExecutionOutcome> {
		let unit = match self.loader.load(image) {
			Ok(unit) => unit,
			Err(err) => {
				self.sink.error(err.to_string());
				return Err(ExecutionOutcome::Faulted(FaultReport {
					type_name: "LoadError".to_string(),
					message: err.0.clone(),
					outer_message: err.0,
					not_supported: false,
				}));
			}
		};
		self.sink.debug(format!("Loaded {}", unit.identity()));

		let Some(entry) = unit.entry_routine() else {
			self.sink.error("No entry point found in the compiled unit");
			return Err(ExecutionOutcome::NoEntryPoint);
		};

		let args = if entry.takes_text_sequence() {
			EntryArgs::Text(Vec::new())
		} else {
			EntryArgs::None
		};
		Ok(PreparedInvocation { unit, entry, args })
	}

	/// Invokes a prepared entry routine on the blocking pool and waits for it.
	///
	/// Once started the invocation runs to completion.
	pub async fn invoke(&self, prepared: PreparedInvocation<L::Unit>, console: &Console) -> ExecutionOutcome {
		let PreparedInvocation { unit, entry, args } = prepared;
		self.sink.debug(format!("Invoking {} with {} parameter(s)", entry.name, entry.params.len()));

		let console = console.clone();
		let started = Instant::now();
		let joined = tokio::task::spawn_blocking(move || unit.invoke(args, &console)).await;
		let elapsed = started.elapsed();

		let outcome = match joined {
			Ok(Ok(())) => ExecutionOutcome::Completed,
			Ok(Err(fault)) => self.report_fault(&fault),
			Err(err) => {
				let message = join_error_panic_message(err).unwrap_or_else(|| "invocation was cancelled".to_string());
				self.sink.error(format!("Entry routine panicked: {message}"));
				ExecutionOutcome::Faulted(FaultReport::panic(message))
			}
		};

		self.sink.debug(format!("Execution finished in {}", format_duration(elapsed)));
		outcome
	}

	fn report_fault(&self, fault: &Fault) -> ExecutionOutcome {
		let report = FaultReport::from_fault(fault);
		if report.not_supported {
			self.sink.error(report.type_name.clone());
		}
		self.sink.error(report.message.clone());
		ExecutionOutcome::Faulted(report)
	}
}
