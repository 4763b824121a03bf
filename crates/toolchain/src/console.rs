use std::sync::Arc;

use parking_lot::Mutex;

/// Captured console output of an invoked program.
///
/// Clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct Console {
	lines: Arc<Mutex<Vec<String>>>,
}

impl Console {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn write_line(&self, line: impl Into<String>) {
		self.lines.lock().push(line.into());
	}

	pub fn lines(&self) -> Vec<String> {
		self.lines.lock().clone()
	}
}
