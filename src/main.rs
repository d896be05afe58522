use anyhow::Result;
use clap::Parser;
use std::io::Read;

use scribe::{
    app::load_config,
    cli::{handle_command, Cli, Commands},
    runtime::BatchRunner,
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set up logging if verbose
    if cli.verbose {
        init_logger();
    }

    // Handle subcommands that don't run the pipeline
    if let Some(command) = &cli.command {
        if handle_command(command)? {
            return Ok(());
        }
    }

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        let toml_str = std::fs::read_to_string(config_path)?;
        toml::from_str(&toml_str)?
    } else {
        load_config().unwrap_or_default()
    };
    if cli.diagnostics {
        config.parser.emit_diagnostics = true;
    }

    // Read the assistant response text
    let response = if let Some(input) = &cli.input {
        std::fs::read_to_string(input)?
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    // Workspace root: flag wins, then config, then current directory default
    let root = cli
        .path
        .clone()
        .unwrap_or_else(|| config.workspace.root.clone());

    let parse_only = matches!(cli.command, Some(Commands::Parse));
    let mut runner = BatchRunner::new(root, &config, parse_only);
    if cli.keep_going {
        runner = runner.keep_going();
    }

    let report = runner.run(&response).await?;
    print!("{}", runner.format_report(&report, cli.output_format));

    // Exit with appropriate code
    if !report.errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
