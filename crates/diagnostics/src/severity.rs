use std::fmt;

/// Log severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	/// Phase timings and other developer-facing detail.
	Debug,
	/// General informational messages.
	Info,
	/// Conditions worth surfacing that do not stop the request.
	Warning,
	/// Failures. Every failed request produces at least one.
	Error,
}

impl Severity {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Debug => "DEBUG",
			Self::Info => "INFO",
			Self::Warning => "WARN",
			Self::Error => "ERROR",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<Severity> for tracing::Level {
	fn from(severity: Severity) -> Self {
		match severity {
			Severity::Debug => tracing::Level::DEBUG,
			Severity::Info => tracing::Level::INFO,
			Severity::Warning => tracing::Level::WARN,
			Severity::Error => tracing::Level::ERROR,
		}
	}
}
