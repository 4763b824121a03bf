use kiln_resources::{ResolveError, TransportError};
use kiln_toolchain::ConversionError;
use thiserror::Error;

/// Failure obtaining one reference. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("could not resolve reference '{name}': {source}")]
	ResolutionFailed {
		name: String,
		#[source]
		source: ResolveError,
	},
	#[error("could not download reference '{name}': {source}")]
	NetworkFailed {
		name: String,
		#[source]
		source: TransportError,
	},
	#[error("could not convert reference '{name}': {source}")]
	ConversionFailed {
		name: String,
		#[source]
		source: ConversionError,
	},
}

impl FetchError {
	/// Logical name of the reference that failed.
	pub fn name(&self) -> &str {
		match self {
			Self::ResolutionFailed { name, .. } | Self::NetworkFailed { name, .. } | Self::ConversionFailed { name, .. } => name,
		}
	}
}
