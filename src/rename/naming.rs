//! Fingerprint to file name mapping
//!
//! Digest names are a pure function of the fingerprint and the [`NamingRule`].
//! Timestamp names need the destination directory: the first free 3-digit
//! index after the timestamp prefix wins.

use chrono::NaiveDateTime;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::error::{RenameError, RenameResult};
use super::types::{FileTask, Fingerprint, NamingRule};

pub const TIMESTAMP_PREFIX_FORMAT: &str = "%Y-%m-%d_%Hh%Mm%Ss_";

/// Highest disambiguation index tried for timestamp names
pub const MAX_INDEX: u32 = 999;

/// Where a file should go, as decided before touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    AlreadyNamed,
    Target(PathBuf),
}

/// prefix + fingerprint (truncated to `rule.length` chars when non-zero) + suffix + extension
pub fn compute_filename(
    fingerprint: &str,
    rule: &NamingRule,
    extension: Option<&OsStr>,
) -> OsString {
    let mut name = String::new();
    if let Some(prefix) = &rule.prefix {
        name.push_str(prefix);
    }
    if rule.length > 0 {
        name.extend(fingerprint.chars().take(rule.length));
    } else {
        name.push_str(fingerprint);
    }
    if let Some(suffix) = &rule.suffix {
        name.push_str(suffix);
    }
    let mut name = OsString::from(name);
    if rule.keep_extension {
        if let Some(extension) = extension {
            name.push(extension);
        }
    }
    debug_assert!(!name.is_empty(), "empty file name for fingerprint {fingerprint:?}");
    name
}

pub fn timestamp_prefix(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_PREFIX_FORMAT).to_string()
}

/// First `<folder>/<prefix><NNN><ext>` for which `is_taken` is false
pub fn next_free_name(
    folder: &Path,
    prefix: &str,
    extension: Option<&OsStr>,
    is_taken: impl Fn(&Path) -> bool,
) -> RenameResult<PathBuf> {
    // Only valid UTF-8 extensions can be lowercased
    let extension = extension
        .map(|ext| match ext.to_str() {
            Some(ext) => OsString::from(ext.to_lowercase()),
            None => ext.to_os_string(),
        })
        .unwrap_or_default();
    (1..=MAX_INDEX)
        .map(|index| {
            let mut name = OsString::from(format!("{prefix}{index:03}"));
            name.push(&extension);
            folder.join(name)
        })
        .find(|candidate| !is_taken(candidate))
        .ok_or_else(|| RenameError::NoFreeName(folder.to_path_buf()))
}

/// Decide the target of `task` inside `dest_dir`
pub fn resolve(
    task: &FileTask,
    fingerprint: &Fingerprint,
    rule: &NamingRule,
    dest_dir: &Path,
    is_taken: impl Fn(&Path) -> bool,
) -> RenameResult<Resolution> {
    let extension = task.extension();
    match fingerprint {
        Fingerprint::Digest(hex) => {
            let name = compute_filename(hex, rule, extension.as_deref());
            Ok(Resolution::Target(dest_dir.join(name)))
        }
        Fingerprint::Timestamp(timestamp) => {
            let prefix = timestamp_prefix(timestamp);
            // A prefixed file elsewhere still has to move into dest_dir
            let already_named = task.parent() == dest_dir
                && task
                    .path()
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(&prefix));
            if already_named {
                return Ok(Resolution::AlreadyNamed);
            }
            next_free_name(dest_dir, &prefix, extension.as_deref(), is_taken)
                .map(Resolution::Target)
        }
    }
}
