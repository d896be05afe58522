use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(version = "0.1.0")]
#[command(about = "Applies file actions embedded in AI assistant output", long_about = None)]
pub struct Cli {
    /// File containing the assistant response text (reads stdin if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Workspace root directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Continue past failed actions instead of stopping the batch
    #[arg(long)]
    pub keep_going: bool,

    /// Report silently-dropped markers and unbound content blocks
    #[arg(long)]
    pub diagnostics: bool,

    /// Output format for the run report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse the input and apply the actions to the workspace (default)
    Apply,
    /// List the actions the input contains without executing them
    Parse,
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
