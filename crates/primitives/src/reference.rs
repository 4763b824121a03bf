use std::fmt;

/// Converted bytes of one module the compiler can consume as a reference.
///
/// Produced per compile request and owned by it; never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceBinary {
	logical_name: String,
	bytes: Vec<u8>,
}

impl ReferenceBinary {
	pub fn new(logical_name: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			logical_name: logical_name.into(),
			bytes,
		}
	}

	/// Logical name the reference was requested under.
	pub fn logical_name(&self) -> &str {
		&self.logical_name
	}

	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}
}

impl fmt::Debug for ReferenceBinary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReferenceBinary")
			.field("logical_name", &self.logical_name)
			.field("len", &self.bytes.len())
			.finish()
	}
}
