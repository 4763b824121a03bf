use pretty_assertions::assert_eq;

use super::*;

fn console_reference() -> ReferenceBinary {
	let module = ModuleImage::new("console", ["print", "argc"]);
	ReferenceBinary::new("kiln.console", module.to_bytes().expect("module should serialize"))
}

fn core_reference() -> ReferenceBinary {
	let module = ModuleImage::new("core", Vec::<String>::new());
	ReferenceBinary::new("kiln.core", module.to_bytes().expect("module should serialize"))
}

fn compile_with(source: &str, references: Vec<ReferenceBinary>, options: &CompileOptions) -> ScriptCompilation {
	let compiler = ScriptCompiler::default();
	let syntax = compiler.parse(source);
	compiler.compile(syntax, references, options)
}

fn compile(source: &str) -> ScriptCompilation {
	compile_with(source, vec![core_reference(), console_reference()], &CompileOptions::executable())
}

fn ids(compilation: &ScriptCompilation) -> Vec<(String, DiagnosticSeverity)> {
	compilation.diagnostics().into_iter().map(|d| (d.id, d.severity)).collect()
}

#[test]
fn valid_program_emits() {
	let compilation = compile("use console\nentry main(args: [string])\nprint \"hello\"\nargc");
	assert!(compilation.diagnostics().is_empty(), "{:?}", compilation.diagnostics());

	let emitted = compilation.emit();
	assert!(emitted.success);
	let image = ProgramImage::from_bytes(&emitted.bytes).expect("image should decode");
	assert_eq!(image.ops, vec![Op::Print("hello".into()), Op::PrintArgc]);
	assert_eq!(image.references, vec!["core".to_string(), "console".to_string()]);
	assert_eq!(
		image.entry,
		Some(EntryDecl {
			name: "main".into(),
			params: vec![crate::ParamType::StringArray],
		})
	);
}

#[test]
fn syntax_errors_block_emission() {
	let compilation = compile("use console\nentry main()\nargc\nprint \"unterminated");
	assert_eq!(ids(&compilation), vec![("KS1002".to_string(), DiagnosticSeverity::Error)]);
	assert_eq!(compilation.diagnostics()[0].line, Some(4));

	let emitted = compilation.emit();
	assert!(!emitted.success);
	assert!(emitted.bytes.is_empty());
	assert_eq!(emitted.diagnostics.len(), 1);
}

#[test]
fn missing_module_and_export_are_errors() {
	let compilation = compile_with("use console\nentry main()\nprint \"x\"", vec![core_reference()], &CompileOptions::executable());
	assert_eq!(
		ids(&compilation),
		vec![("KS0246".to_string(), DiagnosticSeverity::Error), ("KS0103".to_string(), DiagnosticSeverity::Error)]
	);
}

#[test]
fn unreadable_reference_is_reported() {
	let garbage = ReferenceBinary::new("kiln.broken", vec![0xff; 3]);
	let compilation = compile_with("entry main()", vec![garbage], &CompileOptions::executable());
	let diagnostics = compilation.diagnostics();
	assert_eq!(diagnostics[0].id, "KS0009");
	assert!(diagnostics[0].message.contains("kiln.broken"));
}

#[test]
fn warnings_do_not_block_emission() {
	let compilation = compile("use console\nprint \"\"");
	assert_eq!(
		ids(&compilation),
		vec![("KS0078".to_string(), DiagnosticSeverity::Warning), ("KS5001".to_string(), DiagnosticSeverity::Warning)]
	);
	assert!(compilation.emit().success);
}

#[test]
fn library_output_needs_no_entry() {
	let options = CompileOptions {
		output_kind: OutputKind::Library,
		..CompileOptions::executable()
	};
	let compilation = compile_with("throw \"x\"", vec![], &options);
	assert!(compilation.diagnostics().is_empty());
}

#[test]
fn unused_imports_are_hidden_unless_requested() {
	let source = "use console\nentry main()";
	assert_eq!(ids(&compile(source)), vec![("KS8019".to_string(), DiagnosticSeverity::Hidden)]);

	let quiet = CompileOptions {
		report_suppressed_diagnostics: false,
		..CompileOptions::executable()
	};
	assert!(compile_with(source, vec![console_reference()], &quiet).diagnostics().is_empty());
}

#[test]
fn unsafe_requires_permission() {
	let source = "entry main()\nunsafe throw \"x\"";
	assert!(compile(source).diagnostics().is_empty());

	let strict = CompileOptions {
		allow_unsafe: false,
		..CompileOptions::executable()
	};
	let compilation = compile_with(source, vec![], &strict);
	assert_eq!(ids(&compilation), vec![("KS0227".to_string(), DiagnosticSeverity::Error)]);
}

#[test]
fn duplicate_entry_is_an_error() {
	let compilation = compile("entry main()\nentry other()");
	assert_eq!(ids(&compilation), vec![("KS0017".to_string(), DiagnosticSeverity::Error)]);
	assert_eq!(compilation.program().entry.as_ref().map(|e| e.name.as_str()), Some("main"));
}
