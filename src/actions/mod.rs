// Gateway module for actions - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod executor;
mod parser;
mod types;
mod workspace;

// Public re-exports - the ONLY way to access action functionality
pub use executor::execute_action;
pub use parser::{parse_actions, parse_actions_with_diagnostics, Diagnostic};
pub use types::Action;
