use anyhow::Result;
use std::path::PathBuf;

use super::enumerate::Enumerator;
use super::fingerprint::Fingerprinter;
use super::mover::{MoveOptions, Mover};
use super::types::{Entry, NamingRule, RenameReport, RenameSummary, SkippedEntry};
use crate::parallel::{CancelToken, ExecutionStrategy};

/// Enumerate, fingerprint in parallel, then resolve and move each file as its
/// fingerprint completes.
pub struct Renamer {
    fingerprinter: Box<dyn Fingerprinter>,
    rule: NamingRule,
    options: MoveOptions,
    strategy: ExecutionStrategy,
}

impl Renamer {
    pub fn new(
        fingerprinter: Box<dyn Fingerprinter>,
        rule: NamingRule,
        options: MoveOptions,
        strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            fingerprinter,
            rule,
            options,
            strategy,
        }
    }

    /// Process every file under `inputs`.
    ///
    /// `on_skip` is called from the enumeration thread for each input that is
    /// left out; `on_report` is called on this thread once per file, in
    /// completion order. The returned summary accounts for every reported file.
    pub fn run<S, O>(
        &self,
        inputs: Vec<PathBuf>,
        recursive: bool,
        cancel: &CancelToken,
        mut on_skip: S,
        mut on_report: O,
    ) -> Result<RenameSummary>
    where
        S: FnMut(&SkippedEntry) + Send,
        O: FnMut(&RenameReport),
    {
        tracing::info!(
            "processing {} input(s) with {} worker(s){}",
            inputs.len(),
            self.strategy.workers(),
            if self.options.dry_run { " (dryrun)" } else { "" }
        );

        let tasks = Enumerator::new(inputs, recursive).filter_map(move |entry| match entry {
            Entry::File(task) => Some(task),
            Entry::Skipped(skipped) => {
                tracing::debug!("skipping {}: {:?}", skipped.path.display(), skipped.reason);
                on_skip(&skipped);
                None
            }
        });

        let fingerprinter = self.fingerprinter.as_ref();
        let mut mover = Mover::new(self.options.clone());
        let mut summary = RenameSummary::new(self.options.dry_run);

        let completed = self.strategy.execute(
            tasks,
            |task, worker_id| {
                tracing::trace!(worker = worker_id, "fingerprinting {}", task.path().display());
                fingerprinter.fingerprint(task)
            },
            |task, fingerprint| {
                let outcome = mover.settle(&task, fingerprint, &self.rule);
                summary.record(&outcome);
                on_report(&RenameReport {
                    source: task.into_path(),
                    outcome,
                });
            },
            cancel,
        )?;

        debug_assert!(cancel.is_cancelled() || completed == summary.total());
        tracing::info!(
            "{} file(s) processed: {} renamed, {} already named, {} error(s)",
            completed,
            summary.renamed,
            summary.already_named,
            summary.errors
        );
        Ok(summary)
    }
}
