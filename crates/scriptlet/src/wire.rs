//! `.kwc` wire envelopes.
//!
//! Layout: magic `KWC\0`, one version byte, little-endian `u32` payload
//! length, then the payload (a postcard-encoded [`ModuleImage`]). Nothing may
//! follow the payload.

use async_trait::async_trait;
use kiln_primitives::ByteStream;
use kiln_toolchain::{ConversionError, FormatConverter};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::ModuleImage;

pub const MAGIC: [u8; 4] = *b"KWC\0";
pub const VERSION: u8 = 1;
const HEADER_LEN: usize = 9;

/// Upper bound on payload size accepted by [`WireConverter`].
pub const MAX_PAYLOAD_BYTES: u32 = 16 * 1024 * 1024;

/// Wraps a module image in a wire envelope.
pub fn encode_module(module: &ModuleImage) -> Result<Vec<u8>, postcard::Error> {
	let payload = module.to_bytes()?;
	let len = u32::try_from(payload.len()).map_err(|_| postcard::Error::SerializeBufferFull)?;
	let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
	out.extend_from_slice(&MAGIC);
	out.push(VERSION);
	out.extend_from_slice(&len.to_le_bytes());
	out.extend_from_slice(&payload);
	Ok(out)
}

/// [`FormatConverter`] unwrapping `.kwc` envelopes into module images.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireConverter;

#[async_trait]
impl FormatConverter for WireConverter {
	async fn convert(&self, mut wire: ByteStream) -> Result<Vec<u8>, ConversionError> {
		let mut header = [0u8; HEADER_LEN];
		let read = read_up_to(&mut wire, &mut header).await?;
		if read < HEADER_LEN {
			return Err(ConversionError::Malformed(format!("truncated header: {read} of {HEADER_LEN} bytes")));
		}
		if header[..4] != MAGIC {
			return Err(ConversionError::Malformed("not a wire module (bad magic)".into()));
		}
		if header[4] != VERSION {
			return Err(ConversionError::Malformed(format!("unsupported wire version {}", header[4])));
		}
		let len = u32::from_le_bytes([header[5], header[6], header[7], header[8]]);
		if len > MAX_PAYLOAD_BYTES {
			return Err(ConversionError::Malformed(format!("payload of {len} bytes exceeds {MAX_PAYLOAD_BYTES} byte limit")));
		}

		let mut payload = Vec::with_capacity(len as usize);
		(&mut wire).take(u64::from(len)).read_to_end(&mut payload).await?;
		if payload.len() < len as usize {
			return Err(ConversionError::Malformed(format!("truncated payload: {} of {len} bytes", payload.len())));
		}
		let mut probe = [0u8; 1];
		if wire.read(&mut probe).await? != 0 {
			return Err(ConversionError::Malformed("trailing bytes after payload".into()));
		}

		let module = ModuleImage::from_bytes(&payload).map_err(|e| ConversionError::Malformed(format!("invalid module payload: {e}")))?;
		tracing::trace!(module = %module.name, exports = module.exports.len(), "scriptlet.wire.converted");
		Ok(payload)
	}
}

async fn read_up_to<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
	let mut filled = 0;
	while filled < buf.len() {
		let n = reader.read(&mut buf[filled..]).await?;
		if n == 0 {
			break;
		}
		filled += n;
	}
	Ok(filled)
}
