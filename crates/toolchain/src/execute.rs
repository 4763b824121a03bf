use std::fmt;

use thiserror::Error;

use crate::Console;

/// Parameter types an entry routine can declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
	/// A sequence of text values, e.g. command-line arguments.
	TextSequence,
	Text,
	Integer,
	Other(String),
}

/// Declared signature of a unit's entry routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRoutine {
	pub name: String,
	pub params: Vec<ParamKind>,
}

impl EntryRoutine {
	/// True for exactly one parameter typed as a text sequence.
	pub fn takes_text_sequence(&self) -> bool {
		matches!(self.params.as_slice(), [ParamKind::TextSequence])
	}
}

/// Arguments passed to an entry routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryArgs {
	None,
	Text(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
	Runtime,
	/// The feature is not available in this execution environment.
	NotSupported,
}

/// A fault raised by invoked code.
///
/// Runtimes that wrap faults raised inside an invocation put the original in
/// `inner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
	pub type_name: String,
	pub kind: FaultKind,
	pub message: String,
	pub inner: Option<Box<Fault>>,
}

impl Fault {
	pub fn runtime(type_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			kind: FaultKind::Runtime,
			message: message.into(),
			inner: None,
		}
	}

	pub fn not_supported(type_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			kind: FaultKind::NotSupported,
			..Self::runtime(type_name, message)
		}
	}

	/// Wraps `inner` in an outer fault.
	pub fn wrapping(type_name: impl Into<String>, message: impl Into<String>, inner: Fault) -> Self {
		Self {
			inner: Some(Box::new(inner)),
			..Self::runtime(type_name, message)
		}
	}

	/// The innermost fault of the chain, or `self` when nothing is wrapped.
	pub fn root_cause(&self) -> &Fault {
		let mut fault = self;
		while let Some(inner) = fault.inner.as_deref() {
			fault = inner;
		}
		fault
	}
}

impl fmt::Display for Fault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.type_name, self.message)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load unit: {0}")]
pub struct LoadError(pub String);

/// Loads emitted images.
pub trait Loader: Send + Sync {
	type Unit: LoadedUnit;

	fn load(&self, image: &[u8]) -> Result<Self::Unit, LoadError>;
}

/// A loaded, invocable unit.
pub trait LoadedUnit: Send + Sync + 'static {
	/// Human-readable identity, logged after loading.
	fn identity(&self) -> String;

	fn entry_routine(&self) -> Option<EntryRoutine>;

	/// Runs the entry routine to completion, writing output to `console`.
	fn invoke(&self, args: EntryArgs, console: &Console) -> Result<(), Fault>;
}
