//! kleanup - strip cluster state from Kubernetes manifests
//!
//! Reads a multi-document manifest from a file or stdin and writes the
//! cleaned resources to stdout or a file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kleanup::{clean_stream, CleanOptions, Cleaner, OutputFormat, StateMode};

#[derive(Debug, Parser)]
#[command(
    name = "kleanup",
    version,
    about = "Strip cluster-assigned state from Kubernetes manifests"
)]
struct Cli {
    /// Manifest to clean. Use '-' for stdin.
    #[arg(short = 'f', long, default_value = "-")]
    filename: String,

    /// Output location. Use '-' for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,

    /// YAML file with cleaning options. Flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep metadata.managedFields.
    #[arg(long)]
    keep_managed_fields: bool,

    /// Keep the status section.
    #[arg(long)]
    keep_status: bool,

    /// Keep empty maps and lists.
    #[arg(long)]
    keep_empty: bool,

    /// Keep metadata.finalizers.
    #[arg(long)]
    keep_finalizers: bool,

    /// Drop metadata.namespace.
    #[arg(long)]
    remove_namespace: bool,

    /// Turn ReplicaSet-created pods back into Deployments.
    #[arg(long)]
    revert_pods: bool,

    /// Keep only the given half of the resource state.
    #[arg(long, value_enum, value_name = "MODE")]
    preserve_state: Option<StateArg>,

    /// Label key to remove. Repeatable.
    #[arg(long = "remove-label", value_name = "KEY")]
    remove_labels: Vec<String>,

    /// Annotation key to remove. Repeatable.
    #[arg(long = "remove-annotation", value_name = "KEY")]
    remove_annotations: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
    format: FormatArg,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StateArg {
    Desired,
    Runtime,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<StateArg> for StateMode {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Desired => StateMode::Desired,
            StateArg::Runtime => StateMode::Runtime,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "kleanup=debug" } else { "kleanup=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Layers command-line flags over the config file (or the defaults).
fn build_options(cli: &Cli) -> Result<CleanOptions, Box<dyn std::error::Error>> {
    let mut opts = match &cli.config {
        Some(path) => CleanOptions::load(path)?,
        None => CleanOptions::default(),
    };

    if cli.keep_managed_fields {
        opts.remove_managed_fields = false;
    }
    if cli.keep_status {
        opts.remove_status = false;
    }
    if cli.keep_empty {
        opts.remove_empty = false;
    }
    if cli.keep_finalizers {
        opts.cleanup_finalizers = false;
    }
    if cli.remove_namespace {
        opts.remove_namespace = true;
    }
    if cli.revert_pods {
        opts.revert_pod_to_controller = true;
    }
    if let Some(mode) = cli.preserve_state {
        opts = opts.with_preserved_state(mode.into());
    }
    opts.remove_labels.extend(cli.remove_labels.iter().cloned());
    opts.remove_annotations.extend(cli.remove_annotations.iter().cloned());

    Ok(opts)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(&cli)?;
    let cleaner = Cleaner::new(options);

    let input: Box<dyn Read> = if cli.filename == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            fs::File::open(&cli.filename)
                .map_err(|e| format!("Failed to open input file {:?}: {}", cli.filename, e))?,
        )
    };

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    let summary = clean_stream(input, &mut output, &cleaner, cli.format.into())?;

    if summary.cleaned == 0 {
        warn!("no valid Kubernetes resources found in input");
    } else {
        info!(
            cleaned = summary.cleaned,
            skipped = summary.skipped,
            "finished cleaning manifest"
        );
    }
    Ok(())
}
