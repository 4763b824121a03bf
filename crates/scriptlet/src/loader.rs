//! Program image loading and invocation.

use kiln_toolchain::{Console, EntryArgs, EntryRoutine, Fault, LoadError, LoadedUnit, Loader, ParamKind};

use crate::{Op, ParamType, ProgramImage};

/// Type name of the wrapper put around faults raised by invoked code.
pub const INVOCATION_FAULT: &str = "InvocationFault";

/// [`Loader`] for emitted [`ProgramImage`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl Loader for ImageLoader {
	type Unit = ScriptUnit;

	fn load(&self, image: &[u8]) -> Result<ScriptUnit, LoadError> {
		let image = ProgramImage::from_bytes(image).map_err(|e| LoadError(e.to_string()))?;
		Ok(ScriptUnit { image })
	}
}

/// A loaded scriptlet program.
#[derive(Debug, Clone)]
pub struct ScriptUnit {
	image: ProgramImage,
}

impl LoadedUnit for ScriptUnit {
	fn identity(&self) -> String {
		format!("{}, ops={}, references=[{}]", self.image.name, self.image.ops.len(), self.image.references.join(", "))
	}

	fn entry_routine(&self) -> Option<EntryRoutine> {
		self.image.entry.as_ref().map(|entry| EntryRoutine {
			name: entry.name.clone(),
			params: entry
				.params
				.iter()
				.map(|p| match p {
					ParamType::StringArray => ParamKind::TextSequence,
					ParamType::String => ParamKind::Text,
					ParamType::Int => ParamKind::Integer,
				})
				.collect(),
		})
	}

	fn invoke(&self, args: EntryArgs, console: &Console) -> Result<(), Fault> {
		let Some(entry) = &self.image.entry else {
			return Err(Fault::runtime("MissingEntryFault", format!("unit '{}' has no entry routine", self.image.name)));
		};

		let argc = match &args {
			EntryArgs::None => 0,
			EntryArgs::Text(_) => 1,
		};
		if argc != entry.params.len() {
			// Binding failures happen before the routine runs and are not wrapped.
			return Err(Fault::runtime(
				"ParameterCountFault",
				format!("entry routine '{}' takes {} argument(s) but was given {argc}", entry.name, entry.params.len()),
			));
		}

		let received = match &args {
			EntryArgs::None => "argc=none".to_string(),
			EntryArgs::Text(values) => format!("argc={}", values.len()),
		};

		for op in &self.image.ops {
			match op {
				Op::Print(text) => console.write_line(text.clone()),
				Op::PrintArgc => console.write_line(received.clone()),
				Op::Throw(message) => return Err(raised(Fault::runtime("ScriptFault", message.clone()))),
				Op::Unsupported(feature) => {
					return Err(raised(Fault::not_supported(
						"NotSupportedFault",
						format!("'{feature}' is not supported in this environment"),
					)));
				}
			}
		}
		Ok(())
	}
}

fn raised(fault: Fault) -> Fault {
	Fault::wrapping(INVOCATION_FAULT, "the entry routine raised a fault", fault)
}
