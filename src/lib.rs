//! # hrenamer
//!
//! Batch file renamer driven by a per-file fingerprint: a content digest
//! (md5, sha1, sha2 family) or the capture timestamp embedded in photos and
//! videos. Fingerprints are computed on a worker pool; renames happen one at a
//! time on the controlling thread and never overwrite an existing file.
//!
//! ```bash
//! hrenamer hash --len 12 --ext -r ~/Pictures/inbox
//! hrenamer exif -r -o ~/Pictures/sorted ~/Pictures/inbox
//! ```

pub mod cli;
pub mod config;
pub mod parallel;
pub mod rename;

pub use cli::{Cli, Output};
pub use config::RenamerConfig;

/// Result type alias for hrenamer operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
