#![allow(dead_code)]

use std::sync::Arc;

use kiln_diagnostics::DiagnosticSink;
use kiln_pipeline::{CompilationPipeline, ExecutionEngine, ReferenceFetcher, Runner};
use kiln_resources::{Endpoint, ManifestResolver, MemoryTransport};
use kiln_scriptlet::{ImageLoader, ModuleImage, ScriptCompiler, WireConverter, encode_module};
use url::Url;

pub const CORE: &str = "kiln.core";
pub const CONSOLE: &str = "kiln.console";
pub const CORE_DELIVERY: &str = "kiln.core.1a2b3c.kwc";
pub const CONSOLE_DELIVERY: &str = "kiln.console.4d5e6f.kwc";

pub const MANIFEST: &str = r#"{
	"resources": {
		"fingerprinting": {
			"kiln.core.1a2b3c.kwc": "kiln.core",
			"kiln.console.4d5e6f.kwc": "kiln.console"
		}
	}
}"#;

pub fn endpoint() -> Endpoint {
	Endpoint::parse("http://kiln.test/app/", "_framework", "resources.json").expect("endpoint should parse")
}

pub fn manifest_uri() -> Url {
	endpoint().manifest_uri()
}

pub fn resource_uri(delivery: &str) -> Url {
	endpoint().resource_uri(delivery)
}

/// Publishes the manifest and both standard modules.
pub fn publish(transport: &MemoryTransport) {
	transport.insert(&manifest_uri(), MANIFEST);
	let core = ModuleImage::new("core", Vec::<String>::new());
	let console = ModuleImage::new("console", ["print", "argc"]);
	transport.insert(&resource_uri(CORE_DELIVERY), encode_module(&core).expect("core should encode"));
	transport.insert(&resource_uri(CONSOLE_DELIVERY), encode_module(&console).expect("console should encode"));
}

/// A fetcher resolving through a fresh resolver over `transport`.
pub fn fetcher_over(transport: &MemoryTransport) -> ReferenceFetcher {
	let resolver = Arc::new(ManifestResolver::new(endpoint(), Arc::new(transport.clone())));
	ReferenceFetcher::new(resolver, Arc::new(WireConverter))
}

pub fn standard_references() -> Vec<String> {
	vec![CORE.to_string(), CONSOLE.to_string()]
}

pub struct Harness {
	pub transport: MemoryTransport,
	pub sink: DiagnosticSink,
	pub runner: Runner<ScriptCompiler, ImageLoader>,
}

impl Harness {
	/// A runner over a transport with everything published.
	pub fn published() -> Self {
		let transport = MemoryTransport::new();
		publish(&transport);
		Self::over(transport, standard_references())
	}

	pub fn over(transport: MemoryTransport, references: Vec<String>) -> Self {
		let sink = DiagnosticSink::new();
		let fetcher = fetcher_over(&transport);
		let pipeline = CompilationPipeline::new(ScriptCompiler::default(), fetcher, sink.clone());
		let engine = ExecutionEngine::new(ImageLoader, sink.clone());
		let runner = Runner::new(pipeline, engine, references, sink.clone());
		Self { transport, sink, runner }
	}

	pub fn errors(&self) -> Vec<String> {
		self.sink
			.events()
			.into_iter()
			.filter(|event| event.severity == kiln_diagnostics::Severity::Error)
			.map(|event| event.message)
			.collect()
	}
}
