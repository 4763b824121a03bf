//! Basic types shared by every kiln stage.

/// Compiler-consumable reference modules.
pub mod reference;
/// Streaming byte sources.
pub mod stream;

pub use reference::ReferenceBinary;
pub use stream::{ByteStream, byte_stream};
