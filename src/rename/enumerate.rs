//! Input expansion
//!
//! Turns the user's paths into a lazy, deterministic stream of [`Entry`] values.
//! Inputs are sorted before traversal and every directory level is visited in
//! file-name order, so two runs over the same tree see the same sequence.
//! Symlinks are followed; the walker reports loops as skipped entries.

use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use super::types::{Entry, FileTask, SkipReason, SkippedEntry};

pub struct Enumerator {
    pending: std::vec::IntoIter<PathBuf>,
    recursive: bool,
    walker: Option<(PathBuf, walkdir::IntoIter)>,
}

impl Enumerator {
    pub fn new(inputs: impl IntoIterator<Item = PathBuf>, recursive: bool) -> Self {
        let mut inputs: Vec<PathBuf> = inputs.into_iter().collect();
        inputs.sort();
        Self {
            pending: inputs.into_iter(),
            recursive,
            walker: None,
        }
    }

    fn skipped(path: PathBuf, reason: SkipReason) -> Entry {
        Entry::Skipped(SkippedEntry { path, reason })
    }

    fn next_from_walker(&mut self) -> Option<Option<Entry>> {
        let (root, walker) = self.walker.as_mut()?;
        let entry = match walker.next() {
            None => {
                self.walker = None;
                return Some(None);
            }
            Some(Ok(entry)) => entry,
            Some(Err(err)) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.clone());
                tracing::debug!("walk error under {}: {}", root.display(), err);
                return Some(Some(Self::skipped(path, SkipReason::Walk(err.to_string()))));
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            Some(None)
        } else if file_type.is_file() {
            Some(Some(Entry::File(FileTask::new(entry.into_path()))))
        } else {
            Some(Some(Self::skipped(entry.into_path(), SkipReason::NotFileOrDirectory)))
        }
    }

    fn classify_input(&mut self, path: PathBuf) -> Option<Entry> {
        // fs::metadata follows symlinks, so a link to a file counts as a file
        match fs::metadata(&path) {
            Ok(md) if md.is_file() => Some(Entry::File(FileTask::new(path))),
            Ok(md) if md.is_dir() => {
                if self.recursive {
                    let walker = WalkDir::new(&path)
                        .min_depth(1)
                        .follow_links(true)
                        .sort_by_file_name()
                        .into_iter();
                    self.walker = Some((path, walker));
                    None
                } else {
                    Some(Self::skipped(path, SkipReason::DirectoryNotRecursive))
                }
            }
            _ => Some(Self::skipped(path, SkipReason::NotFileOrDirectory)),
        }
    }
}

impl Iterator for Enumerator {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            if let Some(step) = self.next_from_walker() {
                match step {
                    Some(entry) => return Some(entry),
                    None => continue,
                }
            }

            let path = self.pending.next()?;
            if let Some(entry) = self.classify_input(path) {
                return Some(entry);
            }
        }
    }
}
