use url::Url;

use crate::EndpointError;

/// Where manifest and reference files are published.
///
/// Both live under `<base>/<framework-path>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	base: Url,
	framework_path: Vec<String>,
	manifest_file: String,
}

impl Endpoint {
	pub fn new(base: Url, framework_path: &str, manifest_file: impl Into<String>) -> Result<Self, EndpointError> {
		if base.cannot_be_a_base() {
			return Err(EndpointError::CannotBeABase(base.to_string()));
		}
		Ok(Self {
			base,
			framework_path: framework_path.split('/').filter(|s| !s.is_empty()).map(str::to_owned).collect(),
			manifest_file: manifest_file.into(),
		})
	}

	/// Parses `base` and builds an endpoint from it.
	pub fn parse(base: &str, framework_path: &str, manifest_file: impl Into<String>) -> Result<Self, EndpointError> {
		let base = Url::parse(base).map_err(|_| EndpointError::InvalidBase(base.to_string()))?;
		Self::new(base, framework_path, manifest_file)
	}

	pub fn base(&self) -> &Url {
		&self.base
	}

	/// `<base>/<framework-path>/<manifest-file>`.
	pub fn manifest_uri(&self) -> Url {
		self.file_uri(&self.manifest_file)
	}

	/// `<base>/<framework-path>/<delivery-name>`.
	pub fn resource_uri(&self, delivery_name: &str) -> Url {
		self.file_uri(delivery_name)
	}

	fn file_uri(&self, file: &str) -> Url {
		let mut url = self.base.clone();
		url.set_query(None);
		url.set_fragment(None);
		// Checked in `new`: the base can carry path segments.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().extend(&self.framework_path).push(file);
		}
		url
	}
}
