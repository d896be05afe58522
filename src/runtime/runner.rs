use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use crate::{
    actions::{execute_action, parse_actions, parse_actions_with_diagnostics, Action, Diagnostic},
    app::Config,
    cli::OutputFormat,
};

/// Result of applying one batch of actions
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Per-action outcomes, in execution order
    pub actions: Vec<ActionReport>,
    /// Parse anomalies, present only when diagnostics are enabled
    pub diagnostics: Vec<Diagnostic>,
    /// Errors that occurred, one per failed action
    pub errors: Vec<String>,
    /// Metadata about the run
    pub metadata: RunMetadata,
}

#[derive(Debug, Serialize)]
pub struct ActionReport {
    /// Type of action (create_file, move_file, etc.)
    pub action_type: String,
    /// Target (primary path)
    pub target: String,
    /// Description the assistant attached to the marker
    pub description: String,
    /// Whether the action was executed successfully
    pub success: bool,
    /// Output or error message
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Actions applied successfully
    pub applied: usize,
    /// Actions that failed
    pub failed: usize,
    /// Actions skipped after a failure stopped the batch
    pub skipped: usize,
    /// Execution time in milliseconds
    pub duration_ms: u128,
    /// Whether actions were executed at all (false in parse-only mode)
    pub executed: bool,
}

/// Applies one parsed batch of actions to a workspace
///
/// Actions run strictly in parser order, sequentially, each awaited before
/// the next, because later actions may depend on paths created by earlier
/// ones. A failed action leaves everything already applied in place; there is
/// no rollback. There is also no locking between concurrent batches: two
/// overlapping runs against the same workspace may interleave writes, which
/// is an accepted risk of the design rather than a safe property.
pub struct BatchRunner {
    root: PathBuf,
    stop_on_error: bool,
    emit_diagnostics: bool,
    parse_only: bool,
}

impl BatchRunner {
    /// Create a new batch runner for the given workspace root
    pub fn new(root: PathBuf, config: &Config, parse_only: bool) -> Self {
        Self {
            root,
            stop_on_error: config.executor.stop_on_error,
            emit_diagnostics: config.parser.emit_diagnostics,
            parse_only,
        }
    }

    /// Continue past failed actions instead of stopping the batch
    pub fn keep_going(mut self) -> Self {
        self.stop_on_error = false;
        self
    }

    /// Parse the response text and apply the resulting actions in order
    pub async fn run(&self, response: &str) -> Result<BatchReport> {
        let start_time = Instant::now();
        let mut errors = Vec::new();
        let mut reports = Vec::new();

        let (parsed, diagnostics) = if self.emit_diagnostics {
            parse_actions_with_diagnostics(response)
        } else {
            (parse_actions(response), Vec::new())
        };
        debug!("parsed {} actions", parsed.len());

        let mut applied = 0;
        let mut failed = 0;
        let mut skipped = 0;

        if self.parse_only {
            for action in &parsed {
                reports.push(Self::report_for(
                    action,
                    false,
                    Some("Not executed (parse-only mode)".to_string()),
                ));
            }
        } else {
            let mut stopped = false;
            for action in &parsed {
                if stopped {
                    skipped += 1;
                    reports.push(Self::report_for(
                        action,
                        false,
                        Some("Skipped: batch stopped after earlier failure".to_string()),
                    ));
                    continue;
                }

                match execute_action(action, &self.root).await {
                    Ok(output) => {
                        applied += 1;
                        reports.push(Self::report_for(action, true, Some(output)));
                    }
                    Err(e) => {
                        failed += 1;
                        warn!("{}", e);
                        errors.push(e.to_string());
                        reports.push(Self::report_for(action, false, Some(e.to_string())));
                        if self.stop_on_error {
                            stopped = true;
                        }
                    }
                }
            }
        }

        Ok(BatchReport {
            actions: reports,
            diagnostics,
            errors,
            metadata: RunMetadata {
                applied,
                failed,
                skipped,
                duration_ms: start_time.elapsed().as_millis(),
                executed: !self.parse_only,
            },
        })
    }

    fn report_for(action: &Action, success: bool, output: Option<String>) -> ActionReport {
        ActionReport {
            action_type: action.kind().to_string(),
            target: action.target().to_string(),
            description: action.description().to_string(),
            success,
            output,
        }
    }

    /// Format the report according to the output format
    pub fn format_report(&self, report: &BatchReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_else(|e| {
                format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
            }),
            OutputFormat::Text => {
                let mut output = String::new();

                if report.actions.is_empty() {
                    output.push_str("No actions found in input.\n");
                }
                for action in &report.actions {
                    let status = if action.success {
                        "[OK]".green()
                    } else {
                        "[FAIL]".red()
                    };
                    output.push_str(&format!(
                        "{} {} - {}\n",
                        status, action.action_type, action.target
                    ));
                    if let Some(ref out) = action.output {
                        output.push_str(&format!("  {}\n", out));
                    }
                }

                if !report.diagnostics.is_empty() {
                    output.push_str("\n--- Parse diagnostics ---\n");
                    for diagnostic in &report.diagnostics {
                        output.push_str(&format!(
                            "  line {}: {}\n",
                            diagnostic.line, diagnostic.message
                        ));
                    }
                }

                if !report.errors.is_empty() {
                    output.push_str("\n--- Errors ---\n");
                    for error in &report.errors {
                        output.push_str(&format!("  {}\n", error));
                    }
                }

                output
            }
            OutputFormat::Markdown => {
                let mut output = String::new();

                output.push_str("## Actions\n\n");
                if report.actions.is_empty() {
                    output.push_str("_No actions found in input._\n");
                }
                for action in &report.actions {
                    let status = if action.success { "SUCCESS" } else { "FAILED" };
                    output.push_str(&format!(
                        "- {} **{}**: `{}`\n",
                        status, action.action_type, action.target
                    ));
                    if let Some(ref out) = action.output {
                        output.push_str(&format!("  ```\n  {}\n  ```\n", out));
                    }
                }
                output.push('\n');

                if !report.diagnostics.is_empty() {
                    output.push_str("## Parse diagnostics\n\n");
                    for diagnostic in &report.diagnostics {
                        output.push_str(&format!(
                            "- line {}: {}\n",
                            diagnostic.line, diagnostic.message
                        ));
                    }
                    output.push('\n');
                }

                if !report.errors.is_empty() {
                    output.push_str("## Errors\n\n");
                    for error in &report.errors {
                        output.push_str(&format!("- {}\n", error));
                    }
                    output.push('\n');
                }

                output.push_str("---\n");
                output.push_str(&format!(
                    "*Applied: {} | Failed: {} | Skipped: {} | Duration: {}ms*\n",
                    report.metadata.applied,
                    report.metadata.failed,
                    report.metadata.skipped,
                    report.metadata.duration_ms
                ));

                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runner(ws: &TempDir, parse_only: bool) -> BatchRunner {
        BatchRunner::new(ws.path().to_path_buf(), &Config::default(), parse_only)
    }

    #[tokio::test]
    async fn test_full_pipeline_applies_batch_in_order() {
        let ws = TempDir::new().unwrap();
        let text = "\
Setting up the module now.
[CREATE_DIRECTORY:src:module layout]
[CREATE_FILE:src/util.js:add helper]
[FILE_CONTENT:src/util.js]
export const one = () => 1;
[/FILE_CONTENT]
All done!";
        let report = runner(&ws, false).run(text).await.unwrap();
        assert_eq!(report.metadata.applied, 2);
        assert_eq!(report.metadata.failed, 0);
        assert!(report.errors.is_empty());
        let read = std::fs::read_to_string(ws.path().join("src/util.js")).unwrap();
        assert_eq!(read, "export const one = () => 1;");
    }

    #[tokio::test]
    async fn test_stop_on_error_skips_remaining_actions() {
        let ws = TempDir::new().unwrap();
        let text = "\
[CREATE_FILE:a.txt:first]
[DELETE_FILE:missing.txt:will fail]
[CREATE_FILE:b.txt:never reached]";
        let report = runner(&ws, false).run(text).await.unwrap();
        assert_eq!(report.metadata.applied, 1);
        assert_eq!(report.metadata.failed, 1);
        assert_eq!(report.metadata.skipped, 1);
        // Already-applied effects stay applied, the rest never ran
        assert!(ws.path().join("a.txt").exists());
        assert!(!ws.path().join("b.txt").exists());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("delete_file"));
        assert!(report.errors[0].contains("missing.txt"));
    }

    #[tokio::test]
    async fn test_keep_going_continues_past_failure() {
        let ws = TempDir::new().unwrap();
        let text = "\
[DELETE_FILE:missing.txt:will fail]
[CREATE_FILE:b.txt:still runs]";
        let report = runner(&ws, false).keep_going().run(text).await.unwrap();
        assert_eq!(report.metadata.failed, 1);
        assert_eq!(report.metadata.applied, 1);
        assert_eq!(report.metadata.skipped, 0);
        assert!(ws.path().join("b.txt").exists());
    }

    #[tokio::test]
    async fn test_parse_only_executes_nothing() {
        let ws = TempDir::new().unwrap();
        let report = runner(&ws, true)
            .run("[CREATE_FILE:a.txt:listed only]")
            .await
            .unwrap();
        assert_eq!(report.actions.len(), 1);
        assert!(!report.metadata.executed);
        assert!(!ws.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_diagnostics_surface_in_report_when_enabled() {
        let ws = TempDir::new().unwrap();
        let mut config = Config::default();
        config.parser.emit_diagnostics = true;
        let runner = BatchRunner::new(ws.path().to_path_buf(), &config, true);
        let report = runner
            .run("[CREATE_FILE:broken]\nplain prose")
            .await
            .unwrap();
        assert!(report.actions.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let ws = TempDir::new().unwrap();
        let runner = runner(&ws, false);
        let report = runner.run("[CREATE_FILE:a.txt:one]").await.unwrap();
        let json = runner.format_report(&report, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["actions"][0]["action_type"], "create_file");
        assert_eq!(value["metadata"]["applied"], 1);
    }
}
