//! Kiln command-line front end.
//!
//! `kiln run` compiles a source file against references published next to a
//! resource manifest and runs its entry routine. `kiln pack` writes the wire
//! envelope for a reference module.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, PackArgs, RunArgs};
use kiln_config::{Config, Overrides};
use kiln_diagnostics::{DiagnosticSink, LogEvent, Severity};
use kiln_pipeline::{CompilationPipeline, ExecutionEngine, ReferenceFetcher, RunOutcome, Runner};
use kiln_resources::{HttpTransport, ManifestResolver};
use kiln_scriptlet::{ImageLoader, ModuleImage, ScriptCompiler, WireConverter, encode_module};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Configuration file picked up from the working directory.
const DEFAULT_CONFIG: &str = "kiln.toml";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	match cli.command {
		Command::Run(args) => run(args, cli.verbose).await,
		Command::Pack(args) => pack(&args),
	}
}

async fn run(args: RunArgs, verbose: bool) -> anyhow::Result<ExitCode> {
	let source = std::fs::read_to_string(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
	let config = resolve_config(&args)?;
	let endpoint = config.endpoint()?;
	info!(environment = %config.environment, base = %endpoint.base(), "starting kiln run");

	let sink = DiagnosticSink::new();
	let printer = spawn_event_printer(sink.subscribe(), if verbose { Severity::Debug } else { Severity::Info });

	let transport = Arc::new(HttpTransport::new()?);
	let resolver = Arc::new(ManifestResolver::new(endpoint, transport));
	let fetcher = ReferenceFetcher::new(resolver, Arc::new(WireConverter));
	let runner = Runner::new(
		CompilationPipeline::new(ScriptCompiler::default(), fetcher, sink.clone()),
		ExecutionEngine::new(ImageLoader, sink.clone()),
		config.resources.references,
		sink.clone(),
	);

	let cancel = CancellationToken::new();
	let ctrl_c = {
		let cancel = cancel.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				cancel.cancel();
			}
		})
	};

	let report = runner.run(&source, &cancel).await;
	ctrl_c.abort();

	// Closing the sink ends the printer once it has drained.
	drop(runner);
	drop(sink);
	printer.await.context("event printer failed")?;

	for line in &report.console {
		println!("{line}");
	}
	debug!(timings = ?report.timings, total = ?report.timings.total(), "run finished");

	Ok(exit_code(&report.outcome))
}

/// Loads the configuration file, then layers environment and command-line
/// overrides on top.
fn resolve_config(args: &RunArgs) -> anyhow::Result<Config> {
	let mut config = match config_path(args.config.as_deref()) {
		Some(path) => Config::load(&path)?,
		None => Config::default(),
	};
	config.apply(&Overrides::from_env().layered(args.overrides()))?;
	if !args.references.is_empty() {
		config.resources.references = args.references.clone();
	}
	Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
	match explicit {
		Some(path) => Some(path.to_path_buf()),
		None => {
			let path = PathBuf::from(DEFAULT_CONFIG);
			path.is_file().then_some(path)
		}
	}
}

fn exit_code(outcome: &RunOutcome) -> ExitCode {
	if outcome.is_completed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn pack(args: &PackArgs) -> anyhow::Result<ExitCode> {
	let module = ModuleImage::new(&args.module, &args.exports);
	let envelope = encode_module(&module).context("failed to encode module")?;
	std::fs::write(&args.output, &envelope).with_context(|| format!("failed to write {}", args.output.display()))?;
	info!(module = %args.module, path = %args.output.display(), len = envelope.len(), "module packed");
	Ok(ExitCode::SUCCESS)
}

/// Streams sink events at or above `min` to stderr until the sink closes.
fn spawn_event_printer(mut events: Receiver<LogEvent>, min: Severity) -> JoinHandle<()> {
	tokio::spawn(async move {
		loop {
			match events.recv().await {
				Ok(event) if event.severity >= min => eprintln!("{event}"),
				Ok(_) => {}
				Err(RecvError::Lagged(missed)) => eprintln!("({missed} diagnostic events dropped)"),
				Err(RecvError::Closed) => break,
			}
		}
	})
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	// Sink events are printed by the event printer; keep them out of stderr.
	let default_filter = || {
		if verbose {
			EnvFilter::new("debug,kiln::sink=off")
		} else {
			EnvFilter::new("warn,kiln::sink=off")
		}
	};

	if let Some(log_dir) = std::env::var("KILN_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("kiln.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
				if verbose { EnvFilter::new("trace") } else { EnvFilter::new("debug") }
			});

			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter).with(file_layer).init();

			tracing::info!(path = ?log_path, "kiln tracing initialized");
			return;
		}
	}

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
