use std::path::{Component, Path, PathBuf};

use crate::utils::ScribeError;

/// Resolve a workspace-relative action path against the workspace root
///
/// Containment is checked lexically so that paths which do not exist yet are
/// validated the same way as existing ones: empty paths, absolute paths, and
/// any `..` sequence that would step above the root are rejected before any
/// filesystem access happens.
pub fn resolve_in_root(
    root: &Path,
    path: &str,
    action: &'static str,
) -> Result<PathBuf, ScribeError> {
    if path.trim().is_empty() {
        return Err(ScribeError::EmptyPath { action });
    }

    let relative = Path::new(path);
    if relative.is_absolute() {
        return Err(ScribeError::OutsideRoot {
            action,
            path: path.to_string(),
        });
    }

    let mut depth: usize = 0;
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                depth += 1;
                resolved.push(part);
            }
            Component::CurDir => {},
            Component::ParentDir => {
                if depth == 0 {
                    return Err(ScribeError::OutsideRoot {
                        action,
                        path: path.to_string(),
                    });
                }
                depth -= 1;
                resolved.pop();
            }
            // Windows drive prefixes and root markers inside a relative path
            Component::Prefix(_) | Component::RootDir => {
                return Err(ScribeError::OutsideRoot {
                    action,
                    path: path.to_string(),
                });
            }
        }
    }

    Ok(resolved)
}
