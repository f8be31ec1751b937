use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::RenameError;

/// A regular file discovered during enumeration, consumed by exactly one job
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileTask {
    path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Final extension including the leading dot (`".jpg"`), if any.
    /// Non-UTF-8 bytes are kept as they are.
    pub fn extension(&self) -> Option<OsString> {
        self.path
            .extension()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            })
    }

    /// Directory a renamed file lands in when no output folder is given
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Why an input path was left out of the job set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A directory given without `--recursive`
    DirectoryNotRecursive,
    /// Missing path, socket, device, fifo...
    NotFileOrDirectory,
    /// The directory walker could not read an entry (permissions, symlink loop)
    Walk(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// One item of the enumerated input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(FileTask),
    Skipped(SkippedEntry),
}

/// Digest used to fingerprint file content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length of the hex digest in characters
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha224 => 56,
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 => 96,
            HashAlgorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exactly one per file: a hex content digest or an embedded capture timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    Digest(String),
    Timestamp(NaiveDateTime),
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Digest(hex) => f.write_str(hex),
            Fingerprint::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// How a digest becomes a file name. Shared read-only by every worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingRule {
    pub algorithm: HashAlgorithm,
    /// Leading characters kept from the digest (0 = all)
    pub length: usize,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Append the original extension
    pub keep_extension: bool,
}

/// Terminal classification of a [`FileTask`]
#[derive(Debug)]
pub enum RenameOutcome {
    AlreadyNamed,
    Conflict { target: PathBuf },
    DryRunPlanned { target: PathBuf },
    Renamed { target: PathBuf },
    Failed { target: Option<PathBuf>, error: RenameError },
}

/// Outcome of one file, as handed to the caller
#[derive(Debug)]
pub struct RenameReport {
    pub source: PathBuf,
    pub outcome: RenameOutcome,
}

/// Running counters that drive the final summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    pub already_named: usize,
    pub errors: usize,
    pub dry_run: bool,
}

impl RenameSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RenameOutcome) {
        match outcome {
            RenameOutcome::AlreadyNamed => self.already_named += 1,
            RenameOutcome::DryRunPlanned { .. } | RenameOutcome::Renamed { .. } => self.renamed += 1,
            RenameOutcome::Conflict { .. } | RenameOutcome::Failed { .. } => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.renamed + self.already_named + self.errors
    }
}
