use std::fmt;

/// Severity as reported by a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
	/// Normally suppressed; surfaced only on request.
	Hidden,
	Info,
	Warning,
	Error,
}

/// One compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// Stable identifier, e.g. `KS1002`.
	pub id: String,
	pub severity: DiagnosticSeverity,
	pub message: String,
	/// One-based source line, when the diagnostic has a location.
	pub line: Option<usize>,
}

impl Diagnostic {
	pub fn new(id: impl Into<String>, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			severity,
			message: message.into(),
			line: None,
		}
	}

	pub fn at_line(mut self, line: usize) -> Self {
		self.line = Some(line);
		self
	}

	pub fn is_error(&self) -> bool {
		self.severity == DiagnosticSeverity::Error
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.line {
			Some(line) => write!(f, "({line}): {}: {}", self.id, self.message),
			None => write!(f, "{}: {}", self.id, self.message),
		}
	}
}
