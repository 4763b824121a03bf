use kiln_primitives::ReferenceBinary;

use crate::Diagnostic;

/// Kind of unit a compilation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
	/// A standalone unit with an entry routine.
	Executable,
	Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
	pub output_kind: OutputKind,
	/// Permit constructs the compiler cannot verify.
	pub allow_unsafe: bool,
	/// Report diagnostics that are hidden by default.
	pub report_suppressed_diagnostics: bool,
}

impl CompileOptions {
	/// Options used for submitted programs: an executable, unsafe code
	/// allowed, every diagnostic surfaced.
	pub const fn executable() -> Self {
		Self {
			output_kind: OutputKind::Executable,
			allow_unsafe: true,
			report_suppressed_diagnostics: true,
		}
	}
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self::executable()
	}
}

/// Outcome of an emit request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitResult {
	pub success: bool,
	/// The emitted image. Empty unless `success`.
	pub bytes: Vec<u8>,
	pub diagnostics: Vec<Diagnostic>,
}

/// A compiler.
///
/// Parsing never fails: syntax problems are carried inside [`Self::Syntax`]
/// and reported by the compilation's diagnostics.
pub trait Compiler: Send + Sync {
	type Syntax: Send + 'static;
	type Compilation: Compilation;

	fn parse(&self, source: &str) -> Self::Syntax;

	/// Builds a compilation over `syntax` with `references` in the given order.
	fn compile(&self, syntax: Self::Syntax, references: Vec<ReferenceBinary>, options: &CompileOptions) -> Self::Compilation;
}

/// A compiled, not yet emitted program.
pub trait Compilation: Send + 'static {
	/// Every diagnostic the compilation reports, including parse problems.
	fn diagnostics(&self) -> Vec<Diagnostic>;

	/// Emits the program image into memory.
	fn emit(&self) -> EmitResult;
}
