//! Toolchain capabilities.
//!
//! The pipeline does not know how source is compiled, how wire modules are
//! converted, or how emitted images run. It drives three capabilities:
//!
//! - [`Compiler`]: parse source, compile against references, emit an image.
//! - [`FormatConverter`]: turn a wire-delivered module into reference bytes.
//! - [`Loader`]: load an emitted image into a [`LoadedUnit`] and invoke its
//!   entry routine.
//!
//! Faults raised by invoked code are plain data ([`Fault`]), never unwinding
//! errors, so the execution boundary can inspect and report them.

mod compiler;
mod console;
mod convert;
mod diagnostic;
mod execute;

pub use compiler::{Compilation, CompileOptions, Compiler, EmitResult, OutputKind};
pub use console::Console;
pub use convert::{ConversionError, FormatConverter};
pub use diagnostic::{Diagnostic, DiagnosticSeverity};
pub use execute::{EntryArgs, EntryRoutine, Fault, FaultKind, LoadError, LoadedUnit, Loader, ParamKind};
