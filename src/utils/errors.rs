use thiserror::Error;

/// Main error type for Scribe
///
/// Every variant carries the action kind and the offending path so that a
/// failure reported to the user always names what was attempted and where.
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("{action}: no such path: {path}")]
    NotFound { action: &'static str, path: String },

    #[error("{action}: path escapes the workspace root: {path}")]
    OutsideRoot { action: &'static str, path: String },

    #[error("{action}: empty path")]
    EmptyPath { action: &'static str },

    #[error("{action} failed for {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScribeError {
    /// Wrap an I/O error with the action kind and path it occurred on
    pub fn io(action: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
