use async_trait::async_trait;
use kiln_primitives::ByteStream;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
	#[error("reading wire module failed: {0}")]
	Io(#[from] std::io::Error),
	/// The bytes are not a valid wire module.
	#[error("{0}")]
	Malformed(String),
}

/// Converts wire-delivered modules into bytes a [`Compiler`](crate::Compiler)
/// accepts as references.
#[async_trait]
pub trait FormatConverter: Send + Sync {
	/// Consumes `wire` directly from the transport.
	async fn convert(&self, wire: ByteStream) -> Result<Vec<u8>, ConversionError>;
}
