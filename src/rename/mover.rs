//! Conflict-checked, no-overwrite moves
//!
//! The [`Mover`] runs on the controlling thread only, so every side effect of a
//! run is serialized through it. It remembers each target it produced or planned,
//! and in dry-run each source it planned to move away, which keeps dry-run
//! reports identical to what a real run would do.

use std::collections::HashSet;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::error::{RenameError, RenameResult};
use super::naming::{self, Resolution};
use super::types::{FileTask, Fingerprint, NamingRule, RenameOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOptions {
    pub dry_run: bool,
    /// Destination folder; each file's own directory when absent
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Mover {
    options: MoveOptions,
    claimed: HashSet<PathBuf>,
    /// Sources a dry-run planned to move; free again for later files
    vacated: HashSet<PathBuf>,
}

impl Mover {
    pub fn new(options: MoveOptions) -> Self {
        Self {
            options,
            claimed: HashSet::new(),
            vacated: HashSet::new(),
        }
    }

    pub fn destination_dir<'a>(&'a self, task: &'a FileTask) -> &'a Path {
        self.options.output.as_deref().unwrap_or_else(|| task.parent())
    }

    /// A path is taken when it was claimed in this run, or exists on disk and
    /// was not vacated by a planned move
    pub fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path)
            || (fs::symlink_metadata(path).is_ok() && !self.vacated.contains(path))
    }

    /// Turn a finished fingerprint job into the file's final outcome
    pub fn settle(
        &mut self,
        task: &FileTask,
        fingerprint: RenameResult<Fingerprint>,
        rule: &NamingRule,
    ) -> RenameOutcome {
        let fingerprint = match fingerprint {
            Ok(fingerprint) => fingerprint,
            Err(error) => return RenameOutcome::Failed { target: None, error },
        };

        let dest_dir = self.destination_dir(task);
        let resolution = naming::resolve(task, &fingerprint, rule, dest_dir, |p| self.is_taken(p));
        match resolution {
            Ok(Resolution::AlreadyNamed) => RenameOutcome::AlreadyNamed,
            Ok(Resolution::Target(target)) => self.apply(task.path(), target),
            Err(error) => RenameOutcome::Failed { target: None, error },
        }
    }

    /// Move `source` to `target` unless it is already there or `target` is taken
    pub fn apply(&mut self, source: &Path, target: PathBuf) -> RenameOutcome {
        if source == target {
            return RenameOutcome::AlreadyNamed;
        }
        if self.is_taken(&target) {
            tracing::debug!("{} is taken", target.display());
            return RenameOutcome::Conflict { target };
        }
        if self.options.dry_run {
            self.claimed.insert(target.clone());
            self.vacated.insert(source.to_path_buf());
            return RenameOutcome::DryRunPlanned { target };
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                return RenameOutcome::Failed {
                    target: Some(target),
                    error: RenameError::Move(e),
                };
            }
        }

        match move_exclusive(source, &target) {
            Ok(()) => {
                tracing::debug!("moved {} -> {}", source.display(), target.display());
                self.claimed.insert(target.clone());
                RenameOutcome::Renamed { target }
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => RenameOutcome::Conflict { target },
            Err(e) => RenameOutcome::Failed {
                target: Some(target),
                error: RenameError::Move(e),
            },
        }
    }
}

/// Move without ever replacing an existing `target`.
///
/// A hard link fails atomically when the target exists; when linking is not
/// possible (other filesystem, no link support) the content is copied into a
/// freshly created file instead. On any failure the source stays in place.
pub fn move_exclusive(source: &Path, target: &Path) -> io::Result<()> {
    match fs::hard_link(source, target) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(target);
                return Err(e);
            }
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(e),
        Err(e) => {
            tracing::debug!("hard link {} failed ({}), copying", target.display(), e);
            copy_exclusive(source, target)?;
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(target);
                return Err(e);
            }
            Ok(())
        }
    }
}

fn copy_exclusive(source: &Path, target: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(target)?;

    if let Err(e) = fill(&mut reader, &mut writer, &metadata) {
        drop(writer);
        let _ = fs::remove_file(target);
        return Err(e);
    }
    Ok(())
}

fn fill(reader: &mut File, writer: &mut File, metadata: &Metadata) -> io::Result<()> {
    io::copy(reader, writer)?;
    writer.set_permissions(metadata.permissions())?;
    if let Ok(modified) = metadata.modified() {
        writer.set_modified(modified)?;
    }
    writer.sync_all()
}
