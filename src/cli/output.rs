//! Terminal output for rename runs
//!
//! One line per file outcome plus a short summary. Paths are shown with a blue
//! directory and a magenta file name. These lines go to stdout and are not
//! logs: diagnostics go through `tracing` to stderr.

use console::style;
use std::path::Path;

use crate::rename::{RenameOutcome, RenameReport, RenameSummary, SkipReason, SkippedEntry};

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    verbose: bool,
    quiet: bool,
    hints: bool,
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

impl Output {
    /// Create a new output handler. Hints follow `verbose` until overridden.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            hints: verbose,
        }
    }

    /// Show already-named files and non-recursive directory hints
    pub fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Styled path: blue directory, magenta file name
    pub fn label(path: &Path) -> String {
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => format!(
                "{}{}",
                style(format!("{}{}", parent.display(), std::path::MAIN_SEPARATOR)).blue(),
                style(name.to_string_lossy()).magenta()
            ),
            _ => style(path.display()).magenta().to_string(),
        }
    }

    pub fn format_report(&self, report: &RenameReport) -> Option<String> {
        let source = Self::label(&report.source);
        let line = match &report.outcome {
            RenameOutcome::AlreadyNamed => {
                if !self.hints || self.quiet {
                    return None;
                }
                format!("✅ {source} is already renamed")
            }
            RenameOutcome::Conflict { target } => format!(
                "🚩 {source} cannot be renamed {}: {}",
                Self::label(target),
                style("destination already exists").red()
            ),
            RenameOutcome::DryRunPlanned { target } => {
                if self.quiet {
                    return None;
                }
                format!("🙈 {source} would be renamed {} (dryrun)", Self::label(target))
            }
            RenameOutcome::Renamed { target } => {
                if self.quiet {
                    return None;
                }
                format!("✅ {source} was renamed {}", Self::label(target))
            }
            RenameOutcome::Failed { target, error } => {
                let target = target
                    .as_deref()
                    .map(|t| format!(" {}", Self::label(t)))
                    .unwrap_or_default();
                format!("💥 {source} cannot be renamed{target}: {}", style(error).red())
            }
        };
        Some(line)
    }

    pub fn report(&self, report: &RenameReport) {
        if let Some(line) = self.format_report(report) {
            println!("{line}");
        }
    }

    pub fn format_skip(&self, skipped: &SkippedEntry) -> Option<String> {
        let path = Self::label(&skipped.path);
        match &skipped.reason {
            SkipReason::DirectoryNotRecursive => (self.hints && !self.quiet).then(|| {
                format!(
                    "💡 {path} is ignored, use {} to process directory",
                    style("--recursive").bold()
                )
            }),
            SkipReason::NotFileOrDirectory => {
                Some(format!("🚨 {path} is ignored, not a file nor a directory"))
            }
            SkipReason::Walk(error) => Some(format!("🚨 {path} is ignored: {error}")),
        }
    }

    pub fn skipped(&self, skipped: &SkippedEntry) {
        if let Some(line) = self.format_skip(skipped) {
            println!("{line}");
        }
    }

    /// Zero counts are left out
    pub fn summary_lines(summary: &RenameSummary) -> Vec<String> {
        let mut lines = Vec::new();
        if summary.renamed > 0 {
            let n = summary.renamed;
            lines.push(if summary.dry_run {
                format!("  🙈 {} file{} would be renamed", style(n).bold(), plural(n))
            } else {
                format!("  ✅ {} file{} renamed", style(n).bold(), plural(n))
            });
        }
        if summary.already_named > 0 {
            let n = summary.already_named;
            lines.push(format!("  ✅ {} file{} already named", style(n).bold(), plural(n)));
        }
        if summary.errors > 0 {
            let n = summary.errors;
            lines.push(format!("  💥 {} error{}", style(n).red().bold(), plural(n)));
        }
        lines
    }

    pub fn summary(&self, summary: &RenameSummary) {
        for line in Self::summary_lines(summary) {
            println!("{line}");
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("💡").blue(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("error:").red().bold(), message);
    }

    pub fn interrupted(&self) {
        eprintln!("{} {}", style("🚨").red(), style("Interrupted").red().bold());
    }
}
