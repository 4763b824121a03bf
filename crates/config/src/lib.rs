//! Configuration for kiln.
//!
//! Read from `kiln.toml`:
//!
//! ```toml
//! environment = "development"
//!
//! [endpoints]
//! development = "http://localhost:8080/"
//! deployed = "https://cdn.example.org/app/"
//!
//! [resources]
//! framework_path = "_framework"
//! manifest_file = "resources.json"
//! references = ["kiln.core", "kiln.console"]
//! ```
//!
//! Every key is optional; unknown keys are rejected. [`Overrides`] carries the
//! `KILN_ENV` and `KILN_BASE_URL` environment variables on top of the file.

mod error;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
use kiln_resources::Endpoint;
use serde::Deserialize;
use tracing::debug;

/// Variable overriding [`Config::environment`].
pub const ENV_VAR: &str = "KILN_ENV";
/// Variable overriding the selected environment's base URL.
pub const BASE_URL_VAR: &str = "KILN_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_FRAMEWORK_PATH: &str = "_framework";
const DEFAULT_MANIFEST_FILE: &str = "resources.json";

/// Which endpoint resources are fetched from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	#[default]
	Development,
	Deployed,
}

impl Environment {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Development => "development",
			Self::Deployed => "deployed",
		}
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"development" => Ok(Self::Development),
			"deployed" => Ok(Self::Deployed),
			_ => Err(ConfigError::InvalidEnvironment(s.to_string())),
		}
	}
}

/// Base URL per environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
	pub development: String,
	pub deployed: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			development: DEFAULT_BASE_URL.to_string(),
			deployed: DEFAULT_BASE_URL.to_string(),
		}
	}
}

impl Endpoints {
	pub fn get(&self, environment: Environment) -> &str {
		match environment {
			Environment::Development => &self.development,
			Environment::Deployed => &self.deployed,
		}
	}

	fn get_mut(&mut self, environment: Environment) -> &mut String {
		match environment {
			Environment::Development => &mut self.development,
			Environment::Deployed => &mut self.deployed,
		}
	}
}

/// Where the manifest and references live under the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceSettings {
	pub framework_path: String,
	pub manifest_file: String,
	/// Logical names every request compiles against, in order.
	pub references: Vec<String>,
}

impl Default for ResourceSettings {
	fn default() -> Self {
		Self {
			framework_path: DEFAULT_FRAMEWORK_PATH.to_string(),
			manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
			references: Vec::new(),
		}
	}
}

/// Loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub environment: Environment,
	pub endpoints: Endpoints,
	pub resources: ResourceSettings,
}

impl Config {
	/// Parses configuration from TOML text.
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&input)?;
		debug!(path = %path.display(), environment = %config.environment, "config.loaded");
		Ok(config)
	}

	/// Applies overrides on top of the file values.
	///
	/// The environment is switched first, so a base URL override applies to
	/// the newly selected environment.
	pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
		if let Some(environment) = &overrides.environment {
			self.environment = environment.parse()?;
		}
		if let Some(base_url) = &overrides.base_url {
			*self.endpoints.get_mut(self.environment) = base_url.clone();
		}
		Ok(())
	}

	/// Base URL of the selected environment.
	pub fn base_url(&self) -> &str {
		self.endpoints.get(self.environment)
	}

	/// Endpoint for the selected environment.
	pub fn endpoint(&self) -> Result<Endpoint> {
		Ok(Endpoint::parse(
			self.base_url(),
			&self.resources.framework_path,
			self.resources.manifest_file.clone(),
		)?)
	}
}

/// Values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
	pub environment: Option<String>,
	pub base_url: Option<String>,
}

impl Overrides {
	/// Reads [`ENV_VAR`] and [`BASE_URL_VAR`]. Empty values are ignored.
	pub fn from_env() -> Self {
		let var = |name: &str| std::env::var(name).ok().filter(|value| !value.trim().is_empty());
		Self {
			environment: var(ENV_VAR),
			base_url: var(BASE_URL_VAR),
		}
	}

	/// Layers `over` on top of `self`; values set in `over` win.
	pub fn layered(self, over: Self) -> Self {
		Self {
			environment: over.environment.or(self.environment),
			base_url: over.base_url.or(self.base_url),
		}
	}
}

#[cfg(test)]
mod tests;
