use serde::Serialize;
use tracing::debug;

use super::types::Action;
use crate::constants::{
    TAG_COPY_FILE, TAG_CREATE_DIRECTORY, TAG_CREATE_FILE, TAG_CREATE_FOLDER, TAG_DELETE_DIRECTORY,
    TAG_DELETE_FILE, TAG_EDIT_FILE, TAG_FILE_CONTENT_CLOSE, TAG_FILE_CONTENT_OPEN, TAG_MOVE_FILE,
};

/// Header tags in matching priority order
const HEADER_TAGS: &[&str] = &[
    TAG_CREATE_FILE,
    TAG_CREATE_DIRECTORY,
    TAG_CREATE_FOLDER,
    TAG_DELETE_FILE,
    TAG_DELETE_DIRECTORY,
    TAG_MOVE_FILE,
    TAG_COPY_FILE,
    TAG_EDIT_FILE,
];

/// An anomaly the parser absorbed instead of failing on
///
/// Produced only by [`parse_actions_with_diagnostics`]; the plain
/// [`parse_actions`] entry point drops these silently.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// 1-based line number in the response text
    pub line: usize,
    pub message: String,
}

/// One line of response text, classified
#[derive(Debug)]
enum LineToken {
    /// A complete header marker, already turned into an action
    Header(Action),
    /// A `[FILE_CONTENT:path]` open marker
    ContentOpen(String),
    /// A `[/FILE_CONTENT]` close marker
    ContentClose,
    /// Anything else
    Prose,
}

/// Parser scan state: either idle or accumulating a content block
#[derive(Debug)]
enum ScanState {
    Idle,
    Buffering { path: String, buffer: String },
}

/// Parse actions from AI response text
///
/// Total and best-effort: malformed markers and unbound content blocks are
/// dropped without error, and prose is ignored. Actions come back in the
/// order their header markers appear in the text.
pub fn parse_actions(response: &str) -> Vec<Action> {
    parse_actions_with_diagnostics(response).0
}

/// Parse actions, also reporting every anomaly that was silently absorbed
pub fn parse_actions_with_diagnostics(response: &str) -> (Vec<Action>, Vec<Diagnostic>) {
    let mut actions = Vec::new();
    let mut diagnostics = Vec::new();
    let mut state = ScanState::Idle;

    for (idx, line) in response.lines().enumerate() {
        let line_no = idx + 1;
        match classify_line(line, line_no, &mut diagnostics) {
            // A header marker is never treated as prose or content, even
            // while a content block is open.
            LineToken::Header(action) => {
                debug!("line {}: {}", line_no, action.describe());
                actions.push(action);
            }
            LineToken::ContentOpen(path) => {
                // Quirk kept from the reference behavior: a second open
                // marker while buffering starts a new buffer and abandons
                // the first. Nesting is treated as flat.
                if let ScanState::Buffering { path: old, .. } = &state {
                    debug!("line {}: content block for {} abandoned", line_no, old);
                    diagnostics.push(Diagnostic {
                        line: line_no,
                        message: format!(
                            "content block for {} abandoned by a new open marker",
                            old
                        ),
                    });
                }
                state = ScanState::Buffering {
                    path,
                    buffer: String::new(),
                };
            }
            LineToken::ContentClose => match std::mem::replace(&mut state, ScanState::Idle) {
                ScanState::Buffering { path, buffer } => {
                    if !bind_content(&mut actions, &path, buffer.trim()) {
                        debug!("line {}: unbound content block for {}", line_no, path);
                        diagnostics.push(Diagnostic {
                            line: line_no,
                            message: format!(
                                "content block for {} has no matching CREATE_FILE action",
                                path
                            ),
                        });
                    }
                }
                ScanState::Idle => {
                    diagnostics.push(Diagnostic {
                        line: line_no,
                        message: "close marker without an open content block".to_string(),
                    });
                }
            },
            LineToken::Prose => {
                if let ScanState::Buffering { buffer, .. } = &mut state {
                    if !line.is_empty() {
                        buffer.push_str(line);
                        buffer.push('\n');
                    }
                }
            }
        }
    }

    if let ScanState::Buffering { path, .. } = state {
        diagnostics.push(Diagnostic {
            line: response.lines().count(),
            message: format!("content block for {} still open at end of input", path),
        });
    }

    (actions, diagnostics)
}

/// Classify one line, recording a diagnostic for marker-shaped lines that
/// fail to parse
fn classify_line(line: &str, line_no: usize, diagnostics: &mut Vec<Diagnostic>) -> LineToken {
    // Header markers take priority, in fixed order
    for tag in HEADER_TAGS {
        if let Some(body) = marker_body(line, tag) {
            if let Some(action) = action_from_marker(tag, body) {
                return LineToken::Header(action);
            }
            diagnostics.push(Diagnostic {
                line: line_no,
                message: format!("malformed {} marker dropped", tag),
            });
            return LineToken::Prose;
        }
        // Marker-shaped but no closing bracket
        if line.contains(&format!("[{}:", tag)) {
            diagnostics.push(Diagnostic {
                line: line_no,
                message: format!("unterminated {} marker dropped", tag),
            });
            return LineToken::Prose;
        }
    }

    if let Some(start) = line.find(TAG_FILE_CONTENT_OPEN) {
        let rest = &line[start + TAG_FILE_CONTENT_OPEN.len()..];
        if let Some(end) = rest.find(']') {
            return LineToken::ContentOpen(rest[..end].trim().to_string());
        }
        diagnostics.push(Diagnostic {
            line: line_no,
            message: "unterminated FILE_CONTENT marker dropped".to_string(),
        });
        return LineToken::Prose;
    }

    if line.contains(TAG_FILE_CONTENT_CLOSE) {
        return LineToken::ContentClose;
    }

    LineToken::Prose
}

/// Extract the colon-delimited body of `[TAG:...]` from a line
///
/// Matching is line-scoped: text before or after the bracket pair is
/// ignored, and nothing past the closing bracket is re-scanned.
fn marker_body<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("[{}:", tag);
    let start = line.find(&open)?;
    let rest = &line[start + open.len()..];
    let end = rest.find(']')?;
    Some(&rest[..end])
}

/// Build the action for a recognized tag, or None if a required field is
/// missing or empty
fn action_from_marker(tag: &str, body: &str) -> Option<Action> {
    match tag {
        TAG_CREATE_FILE => {
            let (path, description) = two_fields(body)?;
            Some(Action::CreateFile {
                path,
                content: String::new(),
                description,
            })
        }
        // CREATE_FOLDER is an alias: both normalize to CreateDirectory
        TAG_CREATE_DIRECTORY | TAG_CREATE_FOLDER => {
            let (path, description) = two_fields(body)?;
            Some(Action::CreateDirectory { path, description })
        }
        TAG_DELETE_FILE => {
            let (path, description) = two_fields(body)?;
            Some(Action::DeleteFile { path, description })
        }
        TAG_DELETE_DIRECTORY => {
            let (path, description) = two_fields(body)?;
            Some(Action::DeleteDirectory { path, description })
        }
        TAG_MOVE_FILE => {
            let (source_path, destination_path, description) = three_fields(body)?;
            Some(Action::MoveFile {
                source_path,
                destination_path,
                description,
            })
        }
        TAG_COPY_FILE => {
            let (source_path, destination_path, description) = three_fields(body)?;
            Some(Action::CopyFile {
                source_path,
                destination_path,
                description,
            })
        }
        TAG_EDIT_FILE => {
            let (path, description) = two_fields(body)?;
            Some(Action::EditFile {
                path,
                content: String::new(),
                description,
            })
        }
        _ => None,
    }
}

/// Split `path:description`; the description may itself contain colons
fn two_fields(body: &str) -> Option<(String, String)> {
    let (path, description) = body.split_once(':')?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), description.trim().to_string()))
}

/// Split `source:destination:description` for move/copy markers
fn three_fields(body: &str) -> Option<(String, String, String)> {
    let (source, rest) = body.split_once(':')?;
    let (destination, description) = rest.split_once(':')?;
    let source = source.trim();
    let destination = destination.trim();
    if source.is_empty() || destination.is_empty() {
        return None;
    }
    Some((
        source.to_string(),
        destination.to_string(),
        description.trim().to_string(),
    ))
}

/// Bind a closed content block to the most recent CreateFile with the same
/// path, searching back-to-front. Returns false if nothing matched.
fn bind_content(actions: &mut [Action], block_path: &str, content: &str) -> bool {
    for action in actions.iter_mut().rev() {
        if let Action::CreateFile { path, content: c, .. } = action {
            if path == block_path {
                *c = content.to_string();
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_create_file() {
        let actions = parse_actions("[CREATE_FILE:src/main.rs:entry point]");
        assert_eq!(
            actions,
            vec![Action::CreateFile {
                path: "src/main.rs".to_string(),
                content: String::new(),
                description: "entry point".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_single_field_markers() {
        let text = "\
[CREATE_DIRECTORY:src:source dir]
[DELETE_FILE:old.rs:remove old module]
[DELETE_DIRECTORY:tmp:clean up]
[EDIT_FILE:Cargo.toml:bump version]";
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].kind(), "create_directory");
        assert_eq!(actions[1].kind(), "delete_file");
        assert_eq!(actions[2].kind(), "delete_directory");
        assert_eq!(actions[3].kind(), "edit_file");
        assert_eq!(actions[3].target(), "Cargo.toml");
    }

    #[test]
    fn test_create_folder_alias() {
        let actions = parse_actions("[CREATE_FOLDER:x:y]");
        assert_eq!(
            actions,
            vec![Action::CreateDirectory {
                path: "x".to_string(),
                description: "y".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_move_and_copy() {
        let text = "[MOVE_FILE:a.txt:b.txt:rename]\n[COPY_FILE:b.txt:c.txt:duplicate]";
        let actions = parse_actions(text);
        assert_eq!(
            actions,
            vec![
                Action::MoveFile {
                    source_path: "a.txt".to_string(),
                    destination_path: "b.txt".to_string(),
                    description: "rename".to_string(),
                },
                Action::CopyFile {
                    source_path: "b.txt".to_string(),
                    destination_path: "c.txt".to_string(),
                    description: "duplicate".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_move_with_too_few_fields_is_dropped() {
        // Only two colon-delimited fields: not recognized as a move
        assert!(parse_actions("[MOVE_FILE:a.txt:rename]").is_empty());
    }

    #[test]
    fn test_malformed_markers_are_dropped() {
        assert!(parse_actions("[CREATE_FILE:src/main.rs]").is_empty()); // missing description
        assert!(parse_actions("[CREATE_FILE:src/main.rs:oops").is_empty()); // unbalanced
        assert!(parse_actions("[CREATE_FILE::no path]").is_empty()); // empty path
        assert!(parse_actions("[UNKNOWN_TAG:x:y]").is_empty());
    }

    #[test]
    fn test_content_block_binds_to_create_file() {
        let text = "Sure! [CREATE_FILE:src/x.js:add helper]\n\
[FILE_CONTENT:src/x.js]\n\
console.log(1);\n\
[/FILE_CONTENT]\n\
Done.";
        let actions = parse_actions(text);
        assert_eq!(
            actions,
            vec![Action::CreateFile {
                path: "src/x.js".to_string(),
                content: "console.log(1);".to_string(),
                description: "add helper".to_string(),
            }]
        );
    }

    #[test]
    fn test_content_binds_to_most_recent_matching_create() {
        let text = "\
[CREATE_FILE:a.txt:first]
[CREATE_FILE:a.txt:second]
[FILE_CONTENT:a.txt]
body
[/FILE_CONTENT]";
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 2);
        // Back-to-front search: the later action gets the content
        assert_eq!(
            actions[1],
            Action::CreateFile {
                path: "a.txt".to_string(),
                content: "body".to_string(),
                description: "second".to_string(),
            }
        );
        assert_eq!(actions[0].describe(), "Create file: a.txt (0 bytes)");
    }

    #[test]
    fn test_unbound_content_is_discarded() {
        let text = "[FILE_CONTENT:ghost.txt]\nhello\n[/FILE_CONTENT]";
        assert!(parse_actions(text).is_empty());
    }

    #[test]
    fn test_lone_close_marker_is_ignored() {
        assert!(parse_actions("[/FILE_CONTENT]").is_empty());
    }

    #[test]
    fn test_multiline_content_is_trimmed() {
        let text = "\
[CREATE_FILE:f.txt:notes]
[FILE_CONTENT:f.txt]

line one
line two

[/FILE_CONTENT]";
        let actions = parse_actions(text);
        assert_eq!(
            actions[0],
            Action::CreateFile {
                path: "f.txt".to_string(),
                content: "line one\nline two".to_string(),
                description: "notes".to_string(),
            }
        );
    }

    #[test]
    fn test_header_inside_content_block_still_emits() {
        let text = "\
[CREATE_FILE:f.txt:notes]
[FILE_CONTENT:f.txt]
before
[DELETE_FILE:old.txt:cleanup]
after
[/FILE_CONTENT]";
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].kind(), "delete_file");
        // The header line is not part of the buffered content
        assert_eq!(
            actions[0],
            Action::CreateFile {
                path: "f.txt".to_string(),
                content: "before\nafter".to_string(),
                description: "notes".to_string(),
            }
        );
    }

    #[test]
    fn test_second_open_marker_abandons_first_buffer() {
        let text = "\
[CREATE_FILE:a.txt:first]
[CREATE_FILE:b.txt:second]
[FILE_CONTENT:a.txt]
abandoned
[FILE_CONTENT:b.txt]
kept
[/FILE_CONTENT]";
        let actions = parse_actions(text);
        assert_eq!(actions[0].describe(), "Create file: a.txt (0 bytes)");
        assert_eq!(actions[1].describe(), "Create file: b.txt (4 bytes)");
    }

    #[test]
    fn test_marker_with_surrounding_text_matches() {
        let actions = parse_actions("Okay, first [CREATE_DIRECTORY:src:layout] then more.");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target(), "src");
    }

    #[test]
    fn test_prose_and_empty_input() {
        assert!(parse_actions("").is_empty());
        assert!(parse_actions("Just a normal reply with no actions.").is_empty());
    }

    #[test]
    fn test_actions_emitted_in_textual_order() {
        let text = "\
[CREATE_DIRECTORY:d:dir first]
[CREATE_FILE:d/f.txt:then the file]";
        let actions = parse_actions(text);
        assert_eq!(actions[0].kind(), "create_directory");
        assert_eq!(actions[1].kind(), "create_file");
    }

    #[test]
    fn test_diagnostics_report_dropped_anomalies() {
        let text = "\
[CREATE_FILE:ok.txt]
[FILE_CONTENT:ghost.txt]
hello
[/FILE_CONTENT]
[/FILE_CONTENT]";
        let (actions, diagnostics) = parse_actions_with_diagnostics(text);
        assert!(actions.is_empty());
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0].line, 1);
        assert!(diagnostics[0].message.contains("malformed CREATE_FILE"));
        assert!(diagnostics[1].message.contains("no matching CREATE_FILE"));
        assert!(diagnostics[2].message.contains("without an open content block"));
    }

    #[test]
    fn test_diagnostics_report_unterminated_block_at_eof() {
        let (actions, diagnostics) =
            parse_actions_with_diagnostics("[FILE_CONTENT:f.txt]\ndangling");
        assert!(actions.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("still open at end of input"));
    }
}
