//! Error types for configuration loading.

use std::path::PathBuf;

use kiln_resources::EndpointError;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape, including unknown keys.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// An environment name other than `development` or `deployed`.
	#[error("invalid environment: {0} (expected 'development' or 'deployed')")]
	InvalidEnvironment(String),

	/// The selected endpoint does not form a usable base URL.
	#[error("invalid endpoint: {0}")]
	Endpoint(#[from] EndpointError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
