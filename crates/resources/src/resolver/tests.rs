use std::time::Duration;

use super::*;
use crate::MemoryTransport;

const MANIFEST: &str = r#"{
	"resources": {
		"fingerprinting": {
			"kiln.core.7d1e.kwc": "kiln.core",
			"kiln.console.90ab.kwc": "kiln.console",
			"kiln.core.ffff.kwc": "kiln.core"
		}
	}
}"#;

fn endpoint() -> Endpoint {
	Endpoint::parse("http://localhost:8080/", "_framework", "resources.json").expect("endpoint should parse")
}

fn resolver_with(transport: &MemoryTransport) -> ManifestResolver {
	ManifestResolver::new(endpoint(), Arc::new(transport.clone()))
}

fn published(body: &str) -> MemoryTransport {
	let transport = MemoryTransport::new();
	transport.insert(&endpoint().manifest_uri(), body);
	transport
}

#[tokio::test]
async fn resolves_logical_names() {
	let transport = published(MANIFEST);
	let resolver = resolver_with(&transport);

	assert_eq!(resolver.resolve("kiln.console").await.unwrap(), "kiln.console.90ab.kwc");
	assert_eq!(resolver.resolve("kiln.core").await.unwrap(), "kiln.core.7d1e.kwc");
	assert_eq!(resolver.index().await.unwrap().len(), 2);
}

#[tokio::test]
async fn repeated_lookups_fetch_once() {
	let transport = published(MANIFEST);
	let resolver = resolver_with(&transport);

	for _ in 0..5 {
		assert_eq!(resolver.resolve("kiln.core").await.unwrap(), "kiln.core.7d1e.kwc");
	}
	assert_eq!(transport.request_count(&endpoint().manifest_uri()), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_lookups_share_one_fetch() {
	let transport = MemoryTransport::with_latency(Duration::from_millis(25));
	transport.insert(&endpoint().manifest_uri(), MANIFEST);
	let resolver = Arc::new(resolver_with(&transport));

	let mut tasks = Vec::new();
	for i in 0..16 {
		let resolver = Arc::clone(&resolver);
		let name = if i % 2 == 0 { "kiln.core" } else { "kiln.console" };
		tasks.push(tokio::spawn(async move { resolver.resolve(name).await }));
	}
	for task in tasks {
		task.await.expect("task should not panic").expect("lookup should succeed");
	}

	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn blank_names_are_invalid_without_fetching() {
	let transport = published(MANIFEST);
	let resolver = resolver_with(&transport);

	assert_eq!(resolver.resolve("").await, Err(ResolveError::InvalidArgument));
	assert_eq!(resolver.resolve("   ").await, Err(ResolveError::InvalidArgument));
	assert!(transport.requests().is_empty());
	assert!(!resolver.is_loaded());
}

#[tokio::test]
async fn unknown_names_are_not_found() {
	let resolver = resolver_with(&published(MANIFEST));
	assert_eq!(resolver.resolve("unknown-name").await, Err(ResolveError::NotFound("unknown-name".into())));
}

#[tokio::test]
async fn malformed_manifest_poisons_the_resolver() {
	let transport = published(r#"{"resources": {}}"#);
	let resolver = resolver_with(&transport);

	let first = resolver.resolve("kiln.core").await.expect_err("malformed manifest should fail");
	assert!(first.is_invalid_manifest());

	// Fixing the published file does not help: the failure is memoized.
	transport.insert(&endpoint().manifest_uri(), MANIFEST);
	let second = resolver.resolve("kiln.core").await.expect_err("failure should be cached");
	assert_eq!(first, second);
	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_the_failure() {
	let transport = MemoryTransport::with_latency(Duration::from_millis(25));
	transport.fail(&endpoint().manifest_uri(), "connection refused");
	let resolver = Arc::new(resolver_with(&transport));

	let tasks: Vec<_> = (0..8)
		.map(|_| {
			let resolver = Arc::clone(&resolver);
			tokio::spawn(async move { resolver.resolve("kiln.core").await })
		})
		.collect();

	for task in tasks {
		let err = task.await.unwrap().expect_err("manifest fetch should fail");
		assert!(matches!(err, ResolveError::Manifest(ManifestError::Network(ref m)) if m.contains("connection refused")), "got: {err:?}");
	}
	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn abandoned_first_lookup_still_loads_once() {
	let transport = MemoryTransport::with_latency(Duration::from_millis(60));
	transport.insert(&endpoint().manifest_uri(), MANIFEST);
	let resolver = resolver_with(&transport);

	let abandoned = tokio::time::timeout(Duration::from_millis(10), resolver.resolve("kiln.core")).await;
	assert!(abandoned.is_err(), "first lookup should still be waiting on the manifest");

	assert_eq!(resolver.resolve("kiln.console").await.unwrap(), "kiln.console.90ab.kwc");
	assert_eq!(transport.request_count(&endpoint().manifest_uri()), 1);
	assert!(resolver.is_loaded());
}

#[tokio::test]
async fn load_completes_without_any_waiter() {
	let transport = MemoryTransport::with_latency(Duration::from_millis(20));
	transport.insert(&endpoint().manifest_uri(), MANIFEST);
	let resolver = resolver_with(&transport);

	let abandoned = tokio::time::timeout(Duration::from_millis(1), resolver.index()).await;
	assert!(abandoned.is_err());
	tokio::time::sleep(Duration::from_millis(60)).await;

	assert_eq!(transport.request_count(&endpoint().manifest_uri()), 1);
	assert_eq!(resolver.index().await.unwrap().len(), 2);
	assert_eq!(transport.request_count(&endpoint().manifest_uri()), 1);
}
