//! infragc - compile a diagram JSON export into Terraform.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (I/O, config)
//! - 2: Invalid diagram input

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use infragc::{export_terraform, ExportError, GeneratorConfig};

/// Compile an infrastructure diagram into Terraform configuration
#[derive(Parser, Debug)]
#[command(name = "infragc", version, about, long_about = None)]
struct Args {
    /// Diagram JSON file ({ "nodes": [...], "edges": [...] }); stdin when omitted
    input: Option<PathBuf>,

    /// Write the Terraform here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print node/edge/line counts to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("infragc=warn")))
        .try_init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let invalid_input = e.downcast_ref::<ExportError>().is_some();
            ExitCode::from(if invalid_input { 2 } else { 1 })
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    let body: serde_json::Value = serde_json::from_str(&text).map_err(ExportError::from)?;
    let response = export_terraform(&body, &config)?;

    match &args.output {
        Some(path) => std::fs::write(path, &response.terraform)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", response.terraform),
    }

    if args.stats {
        eprintln!(
            "nodes: {}, edges: {}, lines: {}",
            response.stats.nodes, response.stats.edges, response.stats.lines
        );
    }

    Ok(())
}
