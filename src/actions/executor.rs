use std::path::Path;

use tokio::fs;
use tracing::debug;

use super::types::Action;
use super::workspace::resolve_in_root;
use crate::utils::ScribeError;

/// Execute a single action against the workspace rooted at `root`
///
/// One filesystem mutation per call. Returns a short human-readable success
/// message, or a typed error naming the action and path. There is no retry
/// and no rollback: a failed action leaves everything done so far in place.
/// Callers running a batch must execute actions strictly in parser order and
/// await each before issuing the next, since later actions may depend on
/// paths created by earlier ones.
pub async fn execute_action(action: &Action, root: &Path) -> Result<String, ScribeError> {
    let kind = action.kind();
    debug!("executing {}: {}", kind, action.target());

    match action {
        Action::CreateFile { path, content, .. } => {
            let resolved = resolve_in_root(root, path, kind)?;
            ensure_parent(&resolved, kind, path).await?;
            fs::write(&resolved, content)
                .await
                .map_err(|e| ScribeError::io(kind, path, e))?;
            Ok(format!("File created: {}", path))
        }
        Action::CreateDirectory { path, .. } => {
            let resolved = resolve_in_root(root, path, kind)?;
            // Existing directory is a no-op success, not an error. A regular
            // file occupying the path is not: create_dir_all surfaces it.
            if is_directory(&resolved, kind, path).await? {
                return Ok(format!("Directory already exists: {}", path));
            }
            fs::create_dir_all(&resolved)
                .await
                .map_err(|e| ScribeError::io(kind, path, e))?;
            Ok(format!("Directory created: {}", path))
        }
        Action::DeleteFile { path, .. } => {
            let resolved = resolve_in_root(root, path, kind)?;
            require_exists(&resolved, kind, path).await?;
            fs::remove_file(&resolved)
                .await
                .map_err(|e| ScribeError::io(kind, path, e))?;
            Ok(format!("File deleted: {}", path))
        }
        Action::DeleteDirectory { path, .. } => {
            let resolved = resolve_in_root(root, path, kind)?;
            require_exists(&resolved, kind, path).await?;
            fs::remove_dir_all(&resolved)
                .await
                .map_err(|e| ScribeError::io(kind, path, e))?;
            Ok(format!("Directory deleted: {}", path))
        }
        Action::MoveFile {
            source_path,
            destination_path,
            ..
        } => {
            let source = resolve_in_root(root, source_path, kind)?;
            let destination = resolve_in_root(root, destination_path, kind)?;
            require_exists(&source, kind, source_path).await?;
            ensure_parent(&destination, kind, destination_path).await?;
            // Overwrites any existing destination without warning
            fs::rename(&source, &destination)
                .await
                .map_err(|e| ScribeError::io(kind, source_path, e))?;
            Ok(format!("File moved: {} -> {}", source_path, destination_path))
        }
        Action::CopyFile {
            source_path,
            destination_path,
            ..
        } => {
            let source = resolve_in_root(root, source_path, kind)?;
            let destination = resolve_in_root(root, destination_path, kind)?;
            require_exists(&source, kind, source_path).await?;
            ensure_parent(&destination, kind, destination_path).await?;
            fs::copy(&source, &destination)
                .await
                .map_err(|e| ScribeError::io(kind, source_path, e))?;
            Ok(format!("File copied: {} -> {}", source_path, destination_path))
        }
        Action::EditFile { path, content, .. } => {
            let resolved = resolve_in_root(root, path, kind)?;
            // Unlike CreateFile, editing a missing file is an error
            require_exists(&resolved, kind, path).await?;
            fs::write(&resolved, content)
                .await
                .map_err(|e| ScribeError::io(kind, path, e))?;
            Ok(format!("File edited: {}", path))
        }
    }
}

/// Create any missing ancestor directories for a resolved path
async fn ensure_parent(path: &Path, action: &'static str, raw: &str) -> Result<(), ScribeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScribeError::io(action, raw, e))?;
    }
    Ok(())
}

async fn path_exists(path: &Path, action: &'static str, raw: &str) -> Result<bool, ScribeError> {
    fs::try_exists(path)
        .await
        .map_err(|e| ScribeError::io(action, raw, e))
}

/// True only for an existing directory; a missing path or a regular file
/// returns false
async fn is_directory(path: &Path, action: &'static str, raw: &str) -> Result<bool, ScribeError> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ScribeError::io(action, raw, e)),
    }
}

/// Precondition check for delete/move/copy/edit sources
async fn require_exists(path: &Path, action: &'static str, raw: &str) -> Result<(), ScribeError> {
    if path_exists(path, action, raw).await? {
        Ok(())
    } else {
        Err(ScribeError::NotFound {
            action,
            path: raw.to_string(),
        })
    }
}
