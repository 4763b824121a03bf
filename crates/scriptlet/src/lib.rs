//! Scriptlet: the reference toolchain for kiln.
//!
//! A deliberately small language that exercises every capability the
//! pipeline drives. One statement per line, `//` starts a comment:
//!
//! ```text
//! use console
//! entry main(args: [string])
//! print "hello"
//! argc
//! ```
//!
//! | statement | meaning |
//! |---|---|
//! | `use <module>` | import a module provided by a reference |
//! | `entry <name>(<params>)` | declare the entry routine; types `[string]`, `string`, `int` |
//! | `print "<text>"` | write a console line (needs a module exporting `print`) |
//! | `argc` | write the received argument count (needs a module exporting `argc`) |
//! | `throw "<message>"` | raise a runtime fault |
//! | `unsupported "<feature>"` | raise a not-supported fault |
//! | `unsafe <statement>` | run a statement the compiler cannot verify |
//!
//! References travel as `.kwc` wire envelopes ([`wire`]) around a
//! [`ModuleImage`]; [`WireConverter`] unwraps them. [`ScriptCompiler`] emits a
//! [`ProgramImage`] which [`ImageLoader`] loads for invocation.

mod compile;
mod image;
mod loader;
mod syntax;
pub mod wire;

pub use compile::{ScriptCompilation, ScriptCompiler};
pub use image::{EntryDecl, ModuleImage, Op, ParamType, ProgramImage};
pub use loader::{ImageLoader, ScriptUnit};
pub use syntax::{Line, Stmt, SyntaxError, SyntaxTree, parse};
pub use wire::{WireConverter, encode_module};
