pub mod actions;
pub mod app;
pub mod cli;
pub mod constants;
pub mod runtime;
pub mod utils;

pub use actions::{execute_action, parse_actions, parse_actions_with_diagnostics, Action, Diagnostic};
pub use app::{load_config, Config};
pub use runtime::{BatchReport, BatchRunner};
pub use utils::ScribeError;
