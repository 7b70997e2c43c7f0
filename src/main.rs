//! analyse-control CLI - control flow graphs for ES5 programs.
//!
//! Reads an ESTree JSON document (as produced by esprima or acorn) and
//! emits a visualization of its control flow graph.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use analyse_control::{analyse_json, to_dot, to_json, to_mermaid};

/// Control flow graphs for ES5 programs.
///
/// Consumes an ESTree-shaped AST in JSON form and renders the resulting
/// flow graph. Parse JavaScript first, e.g.:
///
///     esparse program.js > program.ast.json
///     analyse-control program.ast.json --format dot | dot -Tpng -o flow.png
#[derive(Parser)]
#[command(
    name = "analyse-control",
    version,
    about = "Control flow graphs for ES5 programs",
    long_about = r#"
Control flow graphs for ES5 programs.

Reads an ESTree JSON document and emits the flow graph.

Examples:
    analyse-control program.ast.json                    # DOT on stdout
    analyse-control program.ast.json --format mermaid   # Mermaid flowchart
    analyse-control program.ast.json --format json      # machine-readable
"#
)]
struct Cli {
    /// Path to an ESTree JSON file
    path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "dot")]
    format: OutputFormat,

    /// Output minified JSON (default: pretty-printed)
    #[arg(long)]
    compact: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Dot,
    Mermaid,
    Json,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("analyse_control={}", filter)));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = std::fs::read_to_string(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let graph = analyse_json(&text)
        .with_context(|| format!("failed to analyse {}", cli.path.display()))?;

    match cli.format {
        OutputFormat::Dot => print!("{}", to_dot(&graph)),
        OutputFormat::Mermaid => print!("{}", to_mermaid(&graph)),
        OutputFormat::Json => {
            let value = to_json(&graph);
            if cli.compact {
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }
    Ok(())
}
