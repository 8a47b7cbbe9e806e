#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use sccpath_core::config;
use sccpath_core::error::ErrorCode;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "sccpath",
    author,
    version,
    about = "sccpath: SCC condensation and critical paths for weighted digraphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze a graph document",
        long_about = "Decompose the graph into strongly connected components, sort the condensation DAG, \
                      and compute shortest and longest paths from the source component.",
        after_help = "EXAMPLES:\n    # Analyze the built-in dataset\n    sccpath analyze\n\n    # Analyze a file from another source vertex\n    sccpath analyze data/large_1.json --source 3\n\n    # Emit machine-readable output\n    sccpath analyze data/small_1.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Generate the standard dataset suite",
        long_about = "Write nine deterministic synthetic graph documents (small, medium, large).",
        after_help = "EXAMPLES:\n    # Generate into ./data with seed 42\n    sccpath generate\n\n    # Choose directory and seed\n    sccpath generate --out-dir /tmp/graphs --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    sccpath completions bash\n\n    # Generate zsh completions\n    sccpath completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose || env::var("DEBUG").is_ok() {
        "sccpath=debug,info"
    } else {
        "sccpath=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCCPATH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let format = env::var("SCCPATH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let cli_format = if cli.json {
        Some(OutputMode::Json.name())
    } else {
        cli.format.map(OutputMode::name)
    };
    let effective = match config::resolve_config(&project_root, cli_format) {
        Ok(effective) => effective,
        Err(err) => {
            let mode = output::resolve_output_mode(cli.format, cli.json, None);
            output::render_error(
                mode,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };
    let output = output::resolve_output_mode(
        cli.format,
        cli.json,
        effective.resolved_output.as_deref(),
    );
    debug!(?output, json = output.is_json(), "output mode resolved");

    match cli.command {
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, output, &effective.project)
        }
        Commands::Generate(ref args) => {
            cmd::generate::run_generate(args, output, &effective.project.generate)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
