//! HTTP transport backed by `reqwest`.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use kiln_primitives::ByteStream;
use reqwest::Client;
use tokio_util::io::StreamReader;
use url::Url;

use crate::{Transport, TransportError};

/// Per-request timeout used by [`HttpTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] performing streaming HTTP GETs.
///
/// Response bodies are handed out as they arrive; nothing is buffered here.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	pub fn new() -> Result<Self, TransportError> {
		let client = Client::builder().timeout(DEFAULT_TIMEOUT).build().map_err(|e| TransportError::Request {
			uri: String::new(),
			message: format!("failed to build http client: {e}"),
		})?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn fetch(&self, uri: &Url) -> Result<ByteStream, TransportError> {
		tracing::debug!(%uri, "transport.http.get");
		let response = self.client.get(uri.clone()).send().await.map_err(|e| TransportError::Request {
			uri: uri.to_string(),
			message: e.to_string(),
		})?;

		let status = response.status();
		if status == reqwest::StatusCode::NOT_FOUND {
			return Err(TransportError::NotFound { uri: uri.to_string() });
		}
		if !status.is_success() {
			return Err(TransportError::Status {
				uri: uri.to_string(),
				status: status.as_u16(),
			});
		}

		let body = response.bytes_stream().map_err(io::Error::other);
		Ok(Box::new(StreamReader::new(Box::pin(body))))
	}
}
