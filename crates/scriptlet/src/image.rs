//! Binary images exchanged between converter, compiler and loader.

use serde::{Deserialize, Serialize};

/// Loadable form of a reference module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImage {
	pub name: String,
	pub exports: Vec<String>,
}

impl ModuleImage {
	pub fn new(name: impl Into<String>, exports: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			name: name.into(),
			exports: exports.into_iter().map(Into::into).collect(),
		}
	}

	pub fn exports(&self, symbol: &str) -> bool {
		self.exports.iter().any(|e| e == symbol)
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
		postcard::to_stdvec(self)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
		postcard::from_bytes(bytes)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
	StringArray,
	String,
	Int,
}

impl ParamType {
	pub fn parse(text: &str) -> Option<Self> {
		match text {
			"[string]" => Some(Self::StringArray),
			"string" => Some(Self::String),
			"int" => Some(Self::Int),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDecl {
	pub name: String,
	pub params: Vec<ParamType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
	Print(String),
	PrintArgc,
	Throw(String),
	Unsupported(String),
}

/// Emitted program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramImage {
	pub name: String,
	pub entry: Option<EntryDecl>,
	pub ops: Vec<Op>,
	/// Modules the program was compiled against, in reference order.
	pub references: Vec<String>,
}

impl ProgramImage {
	pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
		postcard::to_stdvec(self)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
		postcard::from_bytes(bytes)
	}
}
