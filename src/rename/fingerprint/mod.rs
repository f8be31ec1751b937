//! Per-file fingerprint computation
//!
//! A [`Fingerprinter`] runs on worker threads, so implementations must be
//! shareable and must never panic on bad input: every failure is a
//! [`RenameError`](super::error::RenameError) for that one file.

mod digest;
mod exif;

pub use self::digest::DigestFingerprinter;
pub use self::exif::{ExifTool, parse_date};

use super::error::RenameResult;
use super::types::{FileTask, Fingerprint};

pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, task: &FileTask) -> RenameResult<Fingerprint>;
}
