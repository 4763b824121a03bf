use std::io::Cursor;

use tokio::io::AsyncRead;

/// An owned, streaming source of bytes, as handed out by a transport.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Wraps an in-memory buffer as a [`ByteStream`].
pub fn byte_stream(bytes: impl Into<Vec<u8>>) -> ByteStream {
	Box::new(Cursor::new(bytes.into()))
}
