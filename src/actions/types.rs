use serde::{Deserialize, Serialize};

/// A file-system action the AI has asked the host to perform
///
/// Actions are produced by the parser in the order their markers appear in
/// the response text, and consumed exactly once by the executor. The only
/// mutation after parsing is that a `CreateFile`'s content may be filled in
/// by a later `[FILE_CONTENT:...]` block bound to the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Create (or overwrite) a file
    CreateFile {
        path: String,
        content: String,
        description: String,
    },
    /// Create a directory; existing directories are a no-op
    CreateDirectory {
        path: String,
        description: String,
    },
    /// Delete a file
    DeleteFile {
        path: String,
        description: String,
    },
    /// Recursively delete a directory
    DeleteDirectory {
        path: String,
        description: String,
    },
    /// Move a file, overwriting any existing destination
    MoveFile {
        source_path: String,
        destination_path: String,
        description: String,
    },
    /// Copy a file, overwriting any existing destination
    CopyFile {
        source_path: String,
        destination_path: String,
        description: String,
    },
    /// Overwrite an existing file's content (never creates the file)
    EditFile {
        path: String,
        content: String,
        description: String,
    },
}

impl Action {
    /// Short stable label used in reports and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateFile { .. } => "create_file",
            Action::CreateDirectory { .. } => "create_directory",
            Action::DeleteFile { .. } => "delete_file",
            Action::DeleteDirectory { .. } => "delete_directory",
            Action::MoveFile { .. } => "move_file",
            Action::CopyFile { .. } => "copy_file",
            Action::EditFile { .. } => "edit_file",
        }
    }

    /// The primary path this action targets (the source for move/copy)
    pub fn target(&self) -> &str {
        match self {
            Action::CreateFile { path, .. }
            | Action::CreateDirectory { path, .. }
            | Action::DeleteFile { path, .. }
            | Action::DeleteDirectory { path, .. }
            | Action::EditFile { path, .. } => path,
            Action::MoveFile { source_path, .. } | Action::CopyFile { source_path, .. } => {
                source_path
            }
        }
    }

    /// The description the assistant attached to the marker
    pub fn description(&self) -> &str {
        match self {
            Action::CreateFile { description, .. }
            | Action::CreateDirectory { description, .. }
            | Action::DeleteFile { description, .. }
            | Action::DeleteDirectory { description, .. }
            | Action::MoveFile { description, .. }
            | Action::CopyFile { description, .. }
            | Action::EditFile { description, .. } => description,
        }
    }

    /// Get a human-readable one-line summary of this action
    pub fn describe(&self) -> String {
        match self {
            Action::CreateFile { path, content, .. } => {
                format!("Create file: {} ({} bytes)", path, content.len())
            }
            Action::CreateDirectory { path, .. } => {
                format!("Create directory: {}", path)
            }
            Action::DeleteFile { path, .. } => {
                format!("Delete file: {}", path)
            }
            Action::DeleteDirectory { path, .. } => {
                format!("Delete directory: {}", path)
            }
            Action::MoveFile {
                source_path,
                destination_path,
                ..
            } => {
                format!("Move file: {} -> {}", source_path, destination_path)
            }
            Action::CopyFile {
                source_path,
                destination_path,
                ..
            } => {
                format!("Copy file: {} -> {}", source_path, destination_path)
            }
            Action::EditFile { path, .. } => {
                format!("Edit file: {}", path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_target() {
        let action = Action::MoveFile {
            source_path: "a.txt".to_string(),
            destination_path: "b.txt".to_string(),
            description: "rename".to_string(),
        };
        assert_eq!(action.kind(), "move_file");
        assert_eq!(action.target(), "a.txt");
        assert_eq!(action.describe(), "Move file: a.txt -> b.txt");
    }

    #[test]
    fn test_describe_create_file() {
        let action = Action::CreateFile {
            path: "src/lib.rs".to_string(),
            content: "hello".to_string(),
            description: "add lib".to_string(),
        };
        assert_eq!(action.describe(), "Create file: src/lib.rs (5 bytes)");
    }
}
