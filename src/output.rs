//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Progress
//!
//! ```text
//! Thumbnails: 3 to build, 8 workers
//!     ok      /photos/a.jpg
//!     failed  /photos/notes.txt
//!         Reason: cannot decode /photos/notes.txt: ...
//!         Placeholder written
//!     ok      /photos/sub/b.jpg
//! ```
//!
//! ## Summary
//!
//! ```text
//! Pages: 2 written
//! Thumbnails: 2 generated, 5 cached, 1 failed
//! Skipped: 1 entry
//!     /photos/pipe (neither a file nor a directory)
//! Static: built-in stylesheet
//! ```
//!
//! # Architecture
//!
//! Every display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::pipeline::BuildReport;
use crate::pool::ProcessEvent;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 entry`, `2 entries`.
fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single worker pool event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total: 0, .. } => vec!["Thumbnails: all up to date".to_string()],
        ProcessEvent::Started { total, jobs } => vec![format!(
            "Thumbnails: {} to build, {}",
            total,
            plural(*jobs, "worker", "workers")
        )],
        ProcessEvent::Generated { source } => {
            vec![format!("{}ok      {}", indent(1), source.display())]
        }
        ProcessEvent::Failed {
            source,
            reason,
            placeholder_written,
        } => {
            let placeholder = if *placeholder_written {
                "Placeholder written"
            } else {
                "Placeholder could not be written"
            };
            vec![
                format!("{}failed  {}", indent(1), source.display()),
                format!("{}Reason: {}", indent(2), reason),
                format!("{}{}", indent(2), placeholder),
            ]
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-run summary.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        format!("Pages: {} written", report.pages),
        format!(
            "Thumbnails: {} generated, {} cached, {} failed",
            report.generated, report.cached, report.failed
        ),
    ];

    if report.cancelled > 0 {
        lines.push(format!(
            "Cancelled: {} not started",
            plural(report.cancelled, "thumbnail", "thumbnails")
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(format!(
            "Skipped: {}",
            plural(report.skipped.len(), "entry", "entries")
        ));
        for entry in &report.skipped {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                entry.path.display(),
                entry.reason
            ));
        }
    }

    match &report.assets {
        Some(assets) if assets.builtin => lines.push("Static: built-in stylesheet".to_string()),
        Some(assets) => lines.push(format!(
            "Static: {} copied",
            plural(assets.files, "file", "files")
        )),
        None => {}
    }

    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetReport;
    use crate::scan::{SkipReason, SkippedEntry};
    use std::path::PathBuf;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "entry", "entries"), "1 entry");
        assert_eq!(plural(0, "entry", "entries"), "0 entries");
        assert_eq!(plural(3, "file", "files"), "3 files");
    }

    // =========================================================================
    // Process event formatting tests
    // =========================================================================

    #[test]
    fn format_started() {
        let lines = format_process_event(&ProcessEvent::Started { total: 3, jobs: 8 });
        assert_eq!(lines, vec!["Thumbnails: 3 to build, 8 workers"]);
    }

    #[test]
    fn format_started_nothing_to_do() {
        let lines = format_process_event(&ProcessEvent::Started { total: 0, jobs: 8 });
        assert_eq!(lines, vec!["Thumbnails: all up to date"]);
    }

    #[test]
    fn format_generated() {
        let lines = format_process_event(&ProcessEvent::Generated {
            source: PathBuf::from("/photos/a.jpg"),
        });
        assert_eq!(lines, vec!["    ok      /photos/a.jpg"]);
    }

    #[test]
    fn format_failed() {
        let lines = format_process_event(&ProcessEvent::Failed {
            source: PathBuf::from("/photos/notes.txt"),
            reason: "cannot decode".to_string(),
            placeholder_written: true,
        });
        assert_eq!(lines[0], "    failed  /photos/notes.txt");
        assert_eq!(lines[1], "        Reason: cannot decode");
        assert_eq!(lines[2], "        Placeholder written");
    }

    #[test]
    fn format_failed_without_placeholder() {
        let lines = format_process_event(&ProcessEvent::Failed {
            source: PathBuf::from("/photos/x.jpg"),
            reason: "disk full".to_string(),
            placeholder_written: false,
        });
        assert_eq!(lines[2], "        Placeholder could not be written");
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn summary_minimal() {
        let report = BuildReport {
            pages: 2,
            generated: 2,
            ..Default::default()
        };
        let lines = format_build_summary(&report);
        assert_eq!(
            lines,
            vec![
                "Pages: 2 written",
                "Thumbnails: 2 generated, 0 cached, 0 failed",
            ]
        );
    }

    #[test]
    fn summary_with_everything() {
        let report = BuildReport {
            pages: 1,
            items: 4,
            generated: 1,
            cached: 1,
            failed: 1,
            cancelled: 1,
            skipped: vec![SkippedEntry {
                path: PathBuf::from("/photos/pipe"),
                reason: SkipReason::NotFileOrDirectory,
            }],
            assets: Some(AssetReport {
                files: 1,
                builtin: true,
            }),
        };
        let lines = format_build_summary(&report);
        assert_eq!(lines[2], "Cancelled: 1 thumbnail not started");
        assert_eq!(lines[3], "Skipped: 1 entry");
        assert_eq!(lines[4], "    /photos/pipe (neither a file nor a directory)");
        assert_eq!(lines[5], "Static: built-in stylesheet");
    }

    #[test]
    fn summary_copied_assets() {
        let report = BuildReport {
            assets: Some(AssetReport {
                files: 3,
                builtin: false,
            }),
            ..Default::default()
        };
        let lines = format_build_summary(&report);
        assert_eq!(lines.last().unwrap(), "Static: 3 files copied");
    }
}
