//! Batch renaming after a per-file fingerprint
//!
//! ```text
//! Enumerator ──▶ worker pool (fingerprint) ──▶ Mover (resolve + move, one thread) ──▶ RenameSummary
//! ```

pub mod enumerate;
pub mod error;
pub mod fingerprint;
pub mod mover;
pub mod naming;
pub mod pipeline;
pub mod types;

pub use error::{RenameError, RenameResult};
pub use fingerprint::{DigestFingerprinter, ExifTool, Fingerprinter};
pub use mover::MoveOptions;
pub use pipeline::Renamer;
pub use types::{
    Entry, FileTask, Fingerprint, HashAlgorithm, NamingRule, RenameOutcome, RenameReport,
    RenameSummary, SkipReason, SkippedEntry,
};
