use anyhow::Result;

use crate::app::init_config;

use super::Commands;

/// Handle CLI subcommands
///
/// Returns true if the subcommand was fully handled here, false if the
/// pipeline (parse/apply) should still run.
pub fn handle_command(command: &Commands) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Scribe configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        // Continue to the parse/apply pipeline
        Commands::Apply | Commands::Parse => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("Scribe v{}", env!("CARGO_PKG_VERSION"));
    println!("   Applies file actions embedded in AI assistant output");
}
