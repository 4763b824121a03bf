use kiln_diagnostics::Severity;
use kiln_toolchain::DiagnosticSeverity;

/// Maps compiler severities onto sink severities.
///
/// Errors and warnings keep their level; everything else is informational.
pub const fn map_severity(severity: DiagnosticSeverity) -> Severity {
	match severity {
		DiagnosticSeverity::Error => Severity::Error,
		DiagnosticSeverity::Warning => Severity::Warning,
		DiagnosticSeverity::Info | DiagnosticSeverity::Hidden => Severity::Info,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mapping_table() {
		assert_eq!(map_severity(DiagnosticSeverity::Error), Severity::Error);
		assert_eq!(map_severity(DiagnosticSeverity::Warning), Severity::Warning);
		assert_eq!(map_severity(DiagnosticSeverity::Info), Severity::Info);
		assert_eq!(map_severity(DiagnosticSeverity::Hidden), Severity::Info);
	}
}
