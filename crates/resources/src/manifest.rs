//! Manifest document model and the logical-name index derived from it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::ManifestError;

/// One fingerprint entry: a served file and the logical name it provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintEntry {
	pub delivery_name: String,
	pub logical_name: String,
}

/// Parsed resource manifest, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceManifest {
	entries: Vec<FingerprintEntry>,
}

#[derive(Deserialize)]
struct ManifestDocument {
	resources: Option<ResourcesSection>,
}

#[derive(Deserialize)]
struct ResourcesSection {
	fingerprinting: Option<IndexMap<String, String>>,
}

impl ResourceManifest {
	/// Parses a JSON manifest. Sections other than the fingerprint table are ignored.
	pub fn parse(body: &[u8]) -> Result<Self, ManifestError> {
		let doc: ManifestDocument = serde_json::from_slice(body).map_err(|e| ManifestError::Invalid(e.to_string()))?;
		let resources = doc.resources.ok_or_else(|| ManifestError::Invalid("missing 'resources' section".into()))?;
		let table = resources
			.fingerprinting
			.ok_or_else(|| ManifestError::Invalid("missing 'resources.fingerprinting' table".into()))?;
		Ok(Self::from_entries(table.into_iter().map(|(delivery_name, logical_name)| FingerprintEntry {
			delivery_name,
			logical_name,
		})))
	}

	pub fn from_entries(entries: impl IntoIterator<Item = FingerprintEntry>) -> Self {
		Self {
			entries: entries.into_iter().collect(),
		}
	}

	pub fn entries(&self) -> &[FingerprintEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Logical name to delivery name, built once from a [`ResourceManifest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIndex {
	by_logical_name: HashMap<String, String>,
}

impl ResolvedIndex {
	/// Inverts the manifest. The first entry claiming a logical name wins;
	/// later entries for the same name are dropped.
	pub fn from_manifest(manifest: &ResourceManifest) -> Self {
		let mut by_logical_name = HashMap::with_capacity(manifest.len());
		for entry in manifest.entries() {
			if let Entry::Vacant(slot) = by_logical_name.entry(entry.logical_name.clone()) {
				slot.insert(entry.delivery_name.clone());
			}
		}
		Self { by_logical_name }
	}

	pub fn get(&self, logical_name: &str) -> Option<&str> {
		self.by_logical_name.get(logical_name).map(String::as_str)
	}

	/// Number of distinct logical names.
	pub fn len(&self) -> usize {
		self.by_logical_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_logical_name.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn entry(delivery_name: &str, logical_name: &str) -> FingerprintEntry {
		FingerprintEntry {
			delivery_name: delivery_name.into(),
			logical_name: logical_name.into(),
		}
	}

	#[test]
	fn parse_keeps_document_order() {
		let body = br#"{
			"mainAssemblyName": "app",
			"resources": {
				"hash": "sha256-abc",
				"fingerprinting": {
					"kiln.core.b2.kwc": "kiln.core",
					"kiln.console.a1.kwc": "kiln.console"
				}
			}
		}"#;
		let manifest = ResourceManifest::parse(body).expect("manifest should parse");
		assert_eq!(manifest.entries(), &[entry("kiln.core.b2.kwc", "kiln.core"), entry("kiln.console.a1.kwc", "kiln.console")]);
	}

	#[test]
	fn parse_rejects_missing_sections() {
		for body in [&br#"{}"#[..], br#"{"resources": {}}"#, br#"{"resources": {"fingerprinting": 3}}"#, b"not json"] {
			let err = ResourceManifest::parse(body).expect_err("malformed manifest should fail");
			assert!(matches!(err, ManifestError::Invalid(_)), "got: {err:?}");
		}
	}

	#[test]
	fn first_logical_name_wins() {
		let manifest = ResourceManifest::from_entries([
			entry("core.v1.kwc", "kiln.core"),
			entry("console.kwc", "kiln.console"),
			entry("core.v2.kwc", "kiln.core"),
		]);
		let index = ResolvedIndex::from_manifest(&manifest);
		assert_eq!(index.get("kiln.core"), Some("core.v1.kwc"));
		assert_eq!(index.len(), 2);
		assert_eq!(manifest.len(), 3);
	}

	#[test]
	fn empty_table_is_valid() {
		let manifest = ResourceManifest::parse(br#"{"resources": {"fingerprinting": {}}}"#).unwrap();
		assert!(manifest.is_empty());
		assert!(ResolvedIndex::from_manifest(&manifest).is_empty());
	}
}
