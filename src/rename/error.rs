//! Per-file failure taxonomy
//!
//! Everything in here is caught at the file-task boundary and turned into a
//! [`RenameOutcome::Failed`](super::types::RenameOutcome::Failed). None of these
//! errors aborts a run.

use std::path::PathBuf;
use thiserror::Error;

pub type RenameResult<T> = std::result::Result<T, RenameError>;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("exiftool failed: {0}")]
    ExifTool(String),

    #[error("exiftool is unavailable, metadata extraction is disabled for this run")]
    ExifToolUnavailable,

    #[error("unexpected exiftool output: {0}")]
    ExifToolOutput(String),

    #[error("unsupported file type {0}")]
    UnsupportedMimeType(String),

    #[error("cannot find date")]
    MissingDate,

    #[error("invalid date {0}")]
    InvalidDate(String),

    #[error("cannot find a suitable filename in {}", .0.display())]
    NoFreeName(PathBuf),

    #[error("{0}")]
    Move(std::io::Error),
}
