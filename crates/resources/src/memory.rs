use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kiln_primitives::{ByteStream, byte_stream};
use parking_lot::{Mutex, RwLock};
use url::Url;

use crate::{Transport, TransportError};

#[derive(Debug, Default)]
struct MemoryInner {
	bodies: RwLock<HashMap<String, Vec<u8>>>,
	failures: RwLock<HashMap<String, String>>,
	delays: RwLock<HashMap<String, Duration>>,
	requests: Mutex<Vec<String>>,
	latency: Duration,
}

/// In-memory [`Transport`] serving fixed bodies by URI.
///
/// Records every request so callers can assert on network activity. Clones
/// share the same table and request log.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
	inner: Arc<MemoryInner>,
}

impl MemoryTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a transport that waits `latency` before answering each request.
	pub fn with_latency(latency: Duration) -> Self {
		Self {
			inner: Arc::new(MemoryInner {
				latency,
				..MemoryInner::default()
			}),
		}
	}

	/// Publishes `body` at `uri`.
	pub fn insert(&self, uri: &Url, body: impl Into<Vec<u8>>) {
		self.inner.bodies.write().insert(uri.to_string(), body.into());
	}

	/// Makes every request for `uri` fail with a connection error.
	pub fn fail(&self, uri: &Url, message: impl Into<String>) {
		self.inner.failures.write().insert(uri.to_string(), message.into());
	}

	/// Answers requests for `uri` after `latency` instead of the default.
	pub fn delay(&self, uri: &Url, latency: Duration) {
		self.inner.delays.write().insert(uri.to_string(), latency);
	}

	/// Every requested URI, in request order.
	pub fn requests(&self) -> Vec<String> {
		self.inner.requests.lock().clone()
	}

	/// Number of requests made for `uri`.
	pub fn request_count(&self, uri: &Url) -> usize {
		let uri = uri.as_str();
		self.inner.requests.lock().iter().filter(|r| r.as_str() == uri).count()
	}
}

#[async_trait]
impl Transport for MemoryTransport {
	async fn fetch(&self, uri: &Url) -> Result<ByteStream, TransportError> {
		let key = uri.to_string();
		self.inner.requests.lock().push(key.clone());
		tracing::trace!(uri = %key, "transport.memory.fetch");

		let latency = self.inner.delays.read().get(&key).copied().unwrap_or(self.inner.latency);
		if !latency.is_zero() {
			tokio::time::sleep(latency).await;
		}

		if let Some(message) = self.inner.failures.read().get(&key) {
			return Err(TransportError::Request {
				uri: key,
				message: message.clone(),
			});
		}

		match self.inner.bodies.read().get(&key) {
			Some(body) => Ok(byte_stream(body.clone())),
			None => Err(TransportError::NotFound { uri: key }),
		}
	}
}
