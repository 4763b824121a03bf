use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use kiln_primitives::ReferenceBinary;
use kiln_resources::ManifestResolver;
use kiln_toolchain::FormatConverter;
use tracing::debug;

use crate::FetchError;

/// Obtains compiler references by logical name.
///
/// Resolution goes through the shared [`ManifestResolver`]; the download uses
/// the resolver's transport and endpoint. Each call fetches anew. Only the
/// manifest is cached.
#[derive(Clone)]
pub struct ReferenceFetcher {
	resolver: Arc<ManifestResolver>,
	converter: Arc<dyn FormatConverter>,
}

impl fmt::Debug for ReferenceFetcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReferenceFetcher").field("resolver", &self.resolver).finish_non_exhaustive()
	}
}

impl ReferenceFetcher {
	pub fn new(resolver: Arc<ManifestResolver>, converter: Arc<dyn FormatConverter>) -> Self {
		Self { resolver, converter }
	}

	/// Resolves, downloads and converts one reference.
	pub async fn fetch_reference(&self, logical_name: &str) -> Result<ReferenceBinary, FetchError> {
		let delivery = self.resolver.resolve(logical_name).await.map_err(|source| FetchError::ResolutionFailed {
			name: logical_name.to_string(),
			source,
		})?;

		let uri = self.resolver.endpoint().resource_uri(&delivery);
		debug!(logical_name, %uri, "fetching reference");

		let wire = self
			.resolver
			.transport()
			.fetch(&uri)
			.await
			.map_err(|source| FetchError::NetworkFailed {
				name: logical_name.to_string(),
				source,
			})?;

		let bytes = self.converter.convert(wire).await.map_err(|source| FetchError::ConversionFailed {
			name: logical_name.to_string(),
			source,
		})?;

		debug!(logical_name, len = bytes.len(), "reference converted");
		Ok(ReferenceBinary::new(logical_name, bytes))
	}

	/// Fetches every name concurrently. The result keeps the order of
	/// `logical_names`; the first failure aborts the rest.
	pub async fn fetch_all(&self, logical_names: &[String]) -> Result<Vec<ReferenceBinary>, FetchError> {
		try_join_all(logical_names.iter().map(|name| self.fetch_reference(name))).await
	}
}

