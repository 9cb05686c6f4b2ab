//! gadgets CLI tool.
//!
//! Usage:
//! ```bash
//! gadgets check [OPTIONS] [PATH]
//! gadgets fix [OPTIONS] FILE
//! gadgets list-rules
//! gadgets init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Runs syntax-tree inspections over serialized source trees
#[derive(Parser)]
#[command(name = "gadgets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GADGETS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run inspections
    Check {
        /// Tree file or directory to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific inspections (comma-separated short names or ids)
        #[arg(long)]
        rules: Option<String>,

        /// Enable every inspection not disabled by configuration
        #[arg(long, conflicts_with = "rules")]
        all: bool,

        /// Attach fixes that are only offered in interactive sessions
        #[arg(long)]
        interactive: bool,

        /// Print per-inspection timings after the run
        #[arg(long)]
        telemetry: bool,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Apply available fixes to a tree file
    Fix {
        /// Tree file to fix
        file: PathBuf,

        /// Only apply fixes from specific inspections (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Write the fixed tree here instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available inspections
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Rich reports with source snippets.
    Pretty,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            all,
            interactive,
            telemetry,
            exclude,
        } => {
            let source = config_resolver::resolve(project_dir(&path), cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                rules: split_rules(rules.as_deref()),
                all,
                interactive,
                telemetry,
                exclude,
            };
            commands::check::run(&path, &options, &source)
        }
        Commands::Fix {
            file,
            rules,
            output,
        } => {
            let source = config_resolver::resolve(project_dir(&file), cli.config.as_deref());
            commands::fix::run(
                &file,
                split_rules(rules.as_deref()),
                output.as_deref(),
                &source,
            )
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

/// Directory searched for a project config: the path itself, or the
/// directory holding a single tree file.
fn project_dir(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn split_rules(rules: Option<&str>) -> Option<Vec<String>> {
    rules.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    })
}
