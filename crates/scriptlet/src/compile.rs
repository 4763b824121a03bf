//! Semantic checks and emission.

use kiln_primitives::ReferenceBinary;
use kiln_toolchain::{Compilation, CompileOptions, Compiler, Diagnostic, DiagnosticSeverity, EmitResult, OutputKind};

use crate::syntax::{self, Stmt, SyntaxTree};
use crate::{EntryDecl, ModuleImage, Op, ProgramImage};

const DEFAULT_UNIT_NAME: &str = "submission";

/// [`Compiler`] for scriptlet source.
#[derive(Debug, Clone)]
pub struct ScriptCompiler {
	unit_name: String,
}

impl Default for ScriptCompiler {
	fn default() -> Self {
		Self::new(DEFAULT_UNIT_NAME)
	}
}

impl ScriptCompiler {
	pub fn new(unit_name: impl Into<String>) -> Self {
		Self { unit_name: unit_name.into() }
	}
}

impl Compiler for ScriptCompiler {
	type Syntax = SyntaxTree;
	type Compilation = ScriptCompilation;

	fn parse(&self, source: &str) -> SyntaxTree {
		syntax::parse(source)
	}

	fn compile(&self, syntax: SyntaxTree, references: Vec<ReferenceBinary>, options: &CompileOptions) -> ScriptCompilation {
		Checker::new(&self.unit_name, options).check(syntax, &references)
	}
}

/// Result of checking a [`SyntaxTree`] against its references.
#[derive(Debug, Clone)]
pub struct ScriptCompilation {
	diagnostics: Vec<Diagnostic>,
	program: ProgramImage,
}

impl ScriptCompilation {
	pub fn program(&self) -> &ProgramImage {
		&self.program
	}

	fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(Diagnostic::is_error)
	}
}

impl Compilation for ScriptCompilation {
	fn diagnostics(&self) -> Vec<Diagnostic> {
		self.diagnostics.clone()
	}

	fn emit(&self) -> EmitResult {
		if self.has_errors() {
			return EmitResult {
				success: false,
				bytes: Vec::new(),
				diagnostics: self.diagnostics.iter().filter(|d| d.is_error()).cloned().collect(),
			};
		}
		match self.program.to_bytes() {
			Ok(bytes) => EmitResult {
				success: true,
				bytes,
				diagnostics: Vec::new(),
			},
			Err(e) => EmitResult {
				success: false,
				bytes: Vec::new(),
				diagnostics: vec![Diagnostic::new("KS7000", DiagnosticSeverity::Error, format!("failed to write program image: {e}"))],
			},
		}
	}
}

struct Checker<'a> {
	options: &'a CompileOptions,
	diagnostics: Vec<Diagnostic>,
	program: ProgramImage,
}

struct Import {
	line: usize,
	module: ModuleImage,
	used: bool,
}

impl<'a> Checker<'a> {
	fn new(unit_name: &str, options: &'a CompileOptions) -> Self {
		Self {
			options,
			diagnostics: Vec::new(),
			program: ProgramImage {
				name: unit_name.to_string(),
				entry: None,
				ops: Vec::new(),
				references: Vec::new(),
			},
		}
	}

	fn report(&mut self, line: Option<usize>, id: &str, severity: DiagnosticSeverity, message: impl Into<String>) {
		if severity == DiagnosticSeverity::Hidden && !self.options.report_suppressed_diagnostics {
			return;
		}
		let mut diagnostic = Diagnostic::new(id, severity, message);
		diagnostic.line = line;
		self.diagnostics.push(diagnostic);
	}

	fn check(mut self, syntax: SyntaxTree, references: &[ReferenceBinary]) -> ScriptCompilation {
		let available = self.read_references(references);
		let mut imports: Vec<Import> = Vec::new();

		for line in syntax.lines {
			let stmt = match line.stmt {
				Ok(stmt) => stmt,
				Err(error) => {
					self.report(Some(line.number), error.id, DiagnosticSeverity::Error, error.message);
					continue;
				}
			};
			self.check_stmt(line.number, stmt, &available, &mut imports);
		}

		for import in imports.iter().filter(|i| !i.used) {
			let message = format!("unnecessary use of '{}'", import.module.name);
			self.report(Some(import.line), "KS8019", DiagnosticSeverity::Hidden, message);
		}

		if self.program.entry.is_none() && self.options.output_kind == OutputKind::Executable {
			self.report(None, "KS5001", DiagnosticSeverity::Warning, "program has no entry routine");
		}

		ScriptCompilation {
			diagnostics: self.diagnostics,
			program: self.program,
		}
	}

	fn read_references(&mut self, references: &[ReferenceBinary]) -> Vec<ModuleImage> {
		let mut modules = Vec::with_capacity(references.len());
		for reference in references {
			match ModuleImage::from_bytes(reference.bytes()) {
				Ok(module) => {
					self.program.references.push(module.name.clone());
					modules.push(module);
				}
				Err(e) => {
					let message = format!("metadata for reference '{}' could not be read: {e}", reference.logical_name());
					self.report(None, "KS0009", DiagnosticSeverity::Error, message);
				}
			}
		}
		modules
	}

	fn check_stmt(&mut self, line: usize, stmt: Stmt, available: &[ModuleImage], imports: &mut Vec<Import>) {
		match stmt {
			Stmt::Use(name) => {
				if imports.iter().any(|i| i.module.name == name) {
					return;
				}
				match available.iter().find(|m| m.name == name) {
					Some(module) => imports.push(Import {
						line,
						module: module.clone(),
						used: false,
					}),
					None => self.report(
						Some(line),
						"KS0246",
						DiagnosticSeverity::Error,
						format!("module '{name}' was not found; are you missing a reference?"),
					),
				}
			}
			Stmt::Entry { name, params } => {
				if let Some(existing) = &self.program.entry {
					let message = format!("entry routine '{name}' conflicts with '{}'", existing.name);
					self.report(Some(line), "KS0017", DiagnosticSeverity::Error, message);
				} else {
					self.program.entry = Some(EntryDecl { name, params });
				}
			}
			Stmt::Print(text) => {
				if text.is_empty() {
					self.report(Some(line), "KS0078", DiagnosticSeverity::Warning, "empty print statement");
				}
				if self.require_export(line, "print", imports) {
					self.program.ops.push(Op::Print(text));
				}
			}
			Stmt::Argc => {
				if self.require_export(line, "argc", imports) {
					self.program.ops.push(Op::PrintArgc);
				}
			}
			Stmt::Throw(message) => self.program.ops.push(Op::Throw(message)),
			Stmt::Unsupported(feature) => self.program.ops.push(Op::Unsupported(feature)),
			Stmt::Unsafe(inner) => {
				if !self.options.allow_unsafe {
					self.report(Some(line), "KS0227", DiagnosticSeverity::Error, "unsafe code may only appear when unsafe code is allowed");
				}
				self.check_stmt(line, *inner, available, imports);
			}
		}
	}

	fn require_export(&mut self, line: usize, symbol: &str, imports: &mut [Import]) -> bool {
		if let Some(import) = imports.iter_mut().find(|i| i.module.exports(symbol)) {
			import.used = true;
			return true;
		}
		self.report(
			Some(line),
			"KS0103",
			DiagnosticSeverity::Error,
			format!("'{symbol}' does not exist in the current context; no imported module exports it"),
		);
		false
	}
}

#[cfg(test)]
mod tests;
