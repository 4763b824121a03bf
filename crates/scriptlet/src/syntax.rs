//! Line-oriented parser.
//!
//! Parsing never fails as a whole. Each line becomes either a statement or a
//! [`SyntaxError`]; the compiler turns the errors into diagnostics.

use crate::ParamType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
	Use(String),
	Entry { name: String, params: Vec<ParamType> },
	Print(String),
	Argc,
	Throw(String),
	Unsupported(String),
	Unsafe(Box<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	pub id: &'static str,
	pub message: String,
}

impl SyntaxError {
	fn new(id: &'static str, message: impl Into<String>) -> Self {
		Self { id, message: message.into() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
	/// One-based line number.
	pub number: usize,
	pub stmt: Result<Stmt, SyntaxError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
	pub lines: Vec<Line>,
}

impl SyntaxTree {
	pub fn errors(&self) -> impl Iterator<Item = (usize, &SyntaxError)> {
		self.lines.iter().filter_map(|line| line.stmt.as_ref().err().map(|e| (line.number, e)))
	}
}

/// Parses source text. Blank lines and `//` comments are skipped.
pub fn parse(source: &str) -> SyntaxTree {
	let lines = source
		.lines()
		.enumerate()
		.filter_map(|(idx, raw)| {
			let text = strip_comment(raw).trim();
			(!text.is_empty()).then(|| Line {
				number: idx + 1,
				stmt: parse_stmt(text),
			})
		})
		.collect();
	SyntaxTree { lines }
}

fn strip_comment(line: &str) -> &str {
	let mut in_string = false;
	let mut escaped = false;
	for (idx, ch) in line.char_indices() {
		match ch {
			_ if escaped => escaped = false,
			'\\' if in_string => escaped = true,
			'"' => in_string = !in_string,
			'/' if !in_string && line[idx..].starts_with("//") => return &line[..idx],
			_ => {}
		}
	}
	line
}

fn parse_stmt(text: &str) -> Result<Stmt, SyntaxError> {
	let (keyword, rest) = split_keyword(text);
	match keyword {
		"use" => parse_use(rest),
		"entry" => parse_entry(rest),
		"print" => parse_string_literal(rest).map(Stmt::Print),
		"argc" if rest.is_empty() => Ok(Stmt::Argc),
		"throw" => parse_string_literal(rest).map(Stmt::Throw),
		"unsupported" => parse_string_literal(rest).map(Stmt::Unsupported),
		"unsafe" if !rest.is_empty() => parse_stmt(rest).map(|inner| Stmt::Unsafe(Box::new(inner))),
		_ => Err(SyntaxError::new("KS1001", format!("unexpected statement '{text}'"))),
	}
}

fn split_keyword(text: &str) -> (&str, &str) {
	let end = text.find(|c: char| c.is_whitespace() || c == '(').unwrap_or(text.len());
	(&text[..end], text[end..].trim())
}

fn is_identifier(text: &str) -> bool {
	let mut chars = text.chars();
	chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn parse_use(rest: &str) -> Result<Stmt, SyntaxError> {
	if is_identifier(rest) {
		Ok(Stmt::Use(rest.to_string()))
	} else {
		Err(SyntaxError::new("KS1003", format!("expected a module name after 'use', found '{rest}'")))
	}
}

fn parse_entry(rest: &str) -> Result<Stmt, SyntaxError> {
	let malformed = || SyntaxError::new("KS1003", format!("malformed entry declaration '{rest}'; expected 'entry name(params)'"));
	let (name, tail) = rest.split_once('(').ok_or_else(malformed)?;
	let name = name.trim();
	let params = tail.strip_suffix(')').ok_or_else(malformed)?;
	if !is_identifier(name) {
		return Err(malformed());
	}

	let mut parsed = Vec::new();
	for param in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
		let (param_name, ty) = param
			.split_once(':')
			.ok_or_else(|| SyntaxError::new("KS1003", format!("parameter '{param}' has no type")))?;
		if !is_identifier(param_name.trim()) {
			return Err(SyntaxError::new("KS1003", format!("invalid parameter name '{}'", param_name.trim())));
		}
		let ty = ty.trim();
		parsed.push(ParamType::parse(ty).ok_or_else(|| SyntaxError::new("KS1004", format!("unknown parameter type '{ty}'")))?);
	}
	Ok(Stmt::Entry {
		name: name.to_string(),
		params: parsed,
	})
}

fn parse_string_literal(text: &str) -> Result<String, SyntaxError> {
	let invalid = || SyntaxError::new("KS1002", format!("expected a string literal, found '{text}'"));
	let body = text.strip_prefix('"').ok_or_else(invalid)?;

	let mut out = String::new();
	let mut chars = body.char_indices();
	while let Some((idx, ch)) = chars.next() {
		match ch {
			'"' => {
				return if body[idx + 1..].trim().is_empty() {
					Ok(out)
				} else {
					Err(SyntaxError::new("KS1002", format!("unexpected text after string literal: '{}'", &body[idx + 1..])))
				};
			}
			'\\' => match chars.next() {
				Some((_, 'n')) => out.push('\n'),
				Some((_, 't')) => out.push('\t'),
				Some((_, c @ ('"' | '\\'))) => out.push(c),
				Some((_, c)) => return Err(SyntaxError::new("KS1002", format!("unknown escape sequence '\\{c}'"))),
				None => break,
			},
			c => out.push(c),
		}
	}
	Err(SyntaxError::new("KS1002", "unterminated string literal"))
}
