//! Resource resolution for the kiln pipeline.
//!
//! Compiler references are not bundled. They are published next to a
//! resource manifest that maps content-addressed delivery names to stable
//! logical names:
//!
//! ```json
//! { "resources": { "fingerprinting": { "kiln.core.3f9a1c.kwc": "kiln.core" } } }
//! ```
//!
//! [`ManifestResolver`] fetches that manifest once per resolver (single-flight:
//! racing first lookups share one fetch and one parse), inverts it into a
//! [`ResolvedIndex`] and answers logical-name lookups from then on. A failed
//! manifest load is cached as well and never retried.
//!
//! Network access goes through the [`Transport`] capability. [`HttpTransport`]
//! is the production implementation; [`MemoryTransport`] serves fixed bodies
//! for tests and offline use.

mod endpoint;
mod error;
mod http;
mod manifest;
mod memory;
mod resolver;
mod transport;

pub use endpoint::Endpoint;
pub use error::{EndpointError, ManifestError, ResolveError, TransportError};
pub use http::HttpTransport;
pub use manifest::{FingerprintEntry, ResolvedIndex, ResourceManifest};
pub use memory::MemoryTransport;
pub use resolver::ManifestResolver;
pub use transport::Transport;
