use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kiln_config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Compile and run programs against remotely published references")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Compile a source file and run its entry routine
	Run(RunArgs),
	/// Write a wire-format reference module
	Pack(PackArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
	/// Source file to compile
	pub file: PathBuf,

	/// Configuration file (defaults to ./kiln.toml when present)
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Environment whose endpoint is used
	#[arg(long, value_enum)]
	pub env: Option<EnvArg>,

	/// Base URL replacing the configured endpoint
	#[arg(long, value_name = "URL")]
	pub base_url: Option<String>,

	/// Reference to compile against, replacing the configured list (repeatable)
	#[arg(long = "reference", short = 'r', value_name = "NAME")]
	pub references: Vec<String>,
}

impl RunArgs {
	/// Overrides given on the command line.
	pub fn overrides(&self) -> Overrides {
		Overrides {
			environment: self.env.map(|env| env.as_str().to_string()),
			base_url: self.base_url.clone(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvArg {
	Development,
	Deployed,
}

impl EnvArg {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Development => "development",
			Self::Deployed => "deployed",
		}
	}
}

#[derive(Args, Debug)]
pub struct PackArgs {
	/// Module name, as named by `use`
	#[arg(long)]
	pub module: String,

	/// Exported symbol (repeatable)
	#[arg(long = "export", value_name = "SYMBOL")]
	pub exports: Vec<String>,

	/// Output file
	#[arg(short, long, value_name = "FILE")]
	pub output: PathBuf,
}
