use async_trait::async_trait;
use kiln_primitives::ByteStream;
use url::Url;

use crate::TransportError;

/// Retrieves published files.
///
/// Implementations perform exactly one attempt per call; retry policy, if
/// any, belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Starts a GET for `uri` and returns the response body as a stream.
	async fn fetch(&self, uri: &Url) -> Result<ByteStream, TransportError>;
}
