//! Single-flight manifest resolver.

use std::fmt;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};
use url::Url;

use crate::{Endpoint, ManifestError, ResolveError, ResolvedIndex, ResourceManifest, Transport};

type ManifestSlot = Result<Arc<ResolvedIndex>, ManifestError>;
type ManifestLoad = Shared<BoxFuture<'static, ManifestSlot>>;

/// Resolves logical names to delivery names through the resource manifest.
///
/// The manifest is fetched and parsed at most once. The first caller spawns
/// the load; every caller, including the first, awaits the same shared task.
/// The load runs to completion even when the caller that started it is
/// dropped. A failed load is stored too, so the resolver stays poisoned for
/// its lifetime instead of refetching.
pub struct ManifestResolver {
	endpoint: Endpoint,
	transport: Arc<dyn Transport>,
	slot: OnceLock<ManifestLoad>,
}

impl fmt::Debug for ManifestResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ManifestResolver")
			.field("endpoint", &self.endpoint)
			.field("loaded", &self.is_loaded())
			.finish_non_exhaustive()
	}
}

impl ManifestResolver {
	pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>) -> Self {
		Self {
			endpoint,
			transport,
			slot: OnceLock::new(),
		}
	}

	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	pub fn transport(&self) -> &Arc<dyn Transport> {
		&self.transport
	}

	/// Returns the delivery name published for `logical_name`.
	pub async fn resolve(&self, logical_name: &str) -> Result<String, ResolveError> {
		if logical_name.trim().is_empty() {
			return Err(ResolveError::InvalidArgument);
		}
		let index = self.index().await?;
		index
			.get(logical_name)
			.map(str::to_owned)
			.ok_or_else(|| ResolveError::NotFound(logical_name.to_string()))
	}

	/// Returns the index, loading the manifest on first use.
	///
	/// Must be called from within a tokio runtime.
	pub async fn index(&self) -> Result<Arc<ResolvedIndex>, ManifestError> {
		self.slot.get_or_init(|| self.spawn_load()).clone().await
	}

	/// Returns true once a load has completed, successfully or not.
	pub fn is_loaded(&self) -> bool {
		self.slot.get().is_some_and(|load| load.peek().is_some())
	}

	fn spawn_load(&self) -> ManifestLoad {
		let uri = self.endpoint.manifest_uri();
		let task = tokio::spawn(load(uri, Arc::clone(&self.transport)));
		async move {
			task.await
				.unwrap_or_else(|e| Err(ManifestError::Network(format!("manifest load did not complete: {e}"))))
		}
		.boxed()
		.shared()
	}
}

async fn load(uri: Url, transport: Arc<dyn Transport>) -> ManifestSlot {
	debug!(%uri, "resources.manifest.fetch");

	let result: ManifestSlot = async {
		let mut stream = transport.fetch(&uri).await.map_err(|e| ManifestError::Network(e.to_string()))?;
		let mut body = Vec::new();
		stream
			.read_to_end(&mut body)
			.await
			.map_err(|e| ManifestError::Network(format!("reading {uri}: {e}")))?;
		let manifest = ResourceManifest::parse(&body)?;
		let index = ResolvedIndex::from_manifest(&manifest);
		debug!(entries = manifest.len(), logical_names = index.len(), "resources.manifest.cached");
		Ok(Arc::new(index))
	}
	.await;

	if let Err(error) = &result {
		warn!(%uri, %error, "resources.manifest.poisoned");
	}
	result
}

#[cfg(test)]
mod tests;
