//! CLI command definitions and handlers

mod analyze;
mod languages;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bigo - Hybrid time/space complexity estimation
#[derive(Parser, Debug)]
#[command(name = "bigo")]
#[command(
    version,
    about = "Estimate the time and space complexity of code snippets across 8 languages",
    after_help = "\
Examples:
  bigo analyze solution.py                  Analyze a file
  bigo analyze --code 'a.sort()' -l python  Analyze an inline snippet
  bigo analyze src/*.py --format json       JSON output for scripting
  bigo analyze lib.rs --strict              Always enforce pattern guardrails
  bigo languages                            List supported languages"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze files or an inline snippet
    Analyze {
        /// Files to analyze (language inferred from the extension)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Inline code snippet (requires --language)
        #[arg(long, conflicts_with = "files")]
        code: Option<String>,

        /// Language of the snippet (python, javascript, typescript, java, c, cpp, go, rust)
        #[arg(long, short = 'l')]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Always consult pattern guardrails, not only on low confidence
        #[arg(long)]
        strict: bool,

        /// Path to a trained ensemble model (JSON)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Path to a bigo.toml config file (default: discovered in the
        /// current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List supported languages and their file extensions
    Languages,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            files,
            code,
            language,
            format,
            strict,
            model,
            config,
        } => analyze::run(analyze::Args {
            files,
            code,
            language,
            format,
            strict,
            model,
            config,
        }),
        Commands::Languages => languages::run(),
    }
}
