//! CLI command definitions for the `baure` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Baure cultural archive server and tools.
#[derive(Parser)]
#[command(name = "baure", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except warnings and errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log events as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host address to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask one question and print the answer.
    Ask {
        /// The question, in any language.
        question: String,

        /// JSON file holding the recipe the question is about.
        #[arg(long, conflicts_with = "recipe_id")]
        recipe: Option<PathBuf>,

        /// Id of a stored recipe the question is about.
        #[arg(long)]
        recipe_id: Option<String>,

        /// Print the chosen template and prompt without calling the backend.
        #[arg(long)]
        dry_run: bool,
    },

    /// Import archive records from a JSON file.
    Seed {
        /// File shaped as {"recipes": [], "lifeStories": [], "culturalData": []}.
        file: PathBuf,
    },
}
