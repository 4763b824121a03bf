//! Error types for resource resolution.

use thiserror::Error;

/// Errors building an [`Endpoint`](crate::Endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
	#[error("invalid base url '{0}'")]
	InvalidBase(String),
	#[error("base url '{0}' cannot carry a path")]
	CannotBeABase(String),
}

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The request could not be sent or the connection failed.
	#[error("request to {uri} failed: {message}")]
	Request { uri: String, message: String },
	/// The server answered with a non-success status.
	#[error("{uri} returned HTTP {status}")]
	Status { uri: String, status: u16 },
	/// Nothing is published at this location.
	#[error("{uri} not found")]
	NotFound { uri: String },
}

/// Failure loading the resource manifest.
///
/// Cloneable because a failed load is memoized and handed to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
	/// The manifest could not be retrieved.
	#[error("manifest fetch failed: {0}")]
	Network(String),
	/// The manifest was retrieved but lacks the expected structure.
	#[error("invalid manifest: {0}")]
	Invalid(String),
}

/// Failure resolving a logical name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// The logical name was empty or whitespace.
	#[error("logical name must not be blank")]
	InvalidArgument,
	/// The manifest has no entry for this logical name.
	#[error("'{0}' is not listed in the resource manifest")]
	NotFound(String),
	/// The manifest could not be loaded. Permanent for the resolver.
	#[error(transparent)]
	Manifest(#[from] ManifestError),
}

impl ResolveError {
	/// Returns true when the manifest itself was unusable.
	pub fn is_invalid_manifest(&self) -> bool {
		matches!(self, Self::Manifest(ManifestError::Invalid(_)))
	}
}
