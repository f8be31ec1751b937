use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Fingerprinter;
use crate::rename::error::{RenameError, RenameResult};
use crate::rename::types::{FileTask, Fingerprint};

const MIME_TYPE_KEY: &str = "File:MIMEType";

/// Candidate date keys for `image/*` files, most precise first
const IMAGE_DATE_KEYS: &[&str] = &[
    "Composite:SubSecDateTimeOriginal",
    "Composite:SubSecCreateDate",
    "EXIF:DateTimeOriginal",
    "EXIF:CreateDate",
];

/// Candidate date keys for `video/*` files
const VIDEO_DATE_KEYS: &[&str] = &[
    "QuickTime:CreationDate",
    "QuickTime:CreateDate",
    "QuickTime:MediaCreateDate",
];

const INSTALL_HINT: &str =
    "install it with 'sudo apt-get install libimage-exiftool-perl' or set EXIFTOOL_BIN";

/// Capture timestamp read from embedded metadata by an external `exiftool`.
///
/// The executable is resolved once at startup. If it later fails to spawn, the
/// tool disables itself for the rest of the run and every remaining file fails
/// fast with [`RenameError::ExifToolUnavailable`].
#[derive(Debug)]
pub struct ExifTool {
    bin: PathBuf,
    disabled: AtomicBool,
}

impl ExifTool {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            disabled: AtomicBool::new(false),
        }
    }

    /// Locate `bin` on `PATH` (or check it directly when it is a path)
    pub fn resolve(bin: &str) -> Result<Self> {
        let resolved = which::which(bin)
            .with_context(|| format!("Cannot find '{bin}' executable, {INSTALL_HINT}"))?;
        tracing::info!("using exiftool at {}", resolved.display());
        Ok(Self::new(resolved))
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn read_metadata(&self, path: &Path) -> RenameResult<Map<String, Value>> {
        if self.is_disabled() {
            return Err(RenameError::ExifToolUnavailable);
        }

        let output = match Command::new(&self.bin).arg("-G").arg("-j").arg(path).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !self.disabled.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        "Cannot run '{}', {INSTALL_HINT}. Metadata extraction disabled.",
                        self.bin.display()
                    );
                }
                return Err(RenameError::ExifToolUnavailable);
            }
            Err(e) => return Err(RenameError::ExifTool(e.to_string())),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(RenameError::ExifTool(message));
        }

        parse_records(&output.stdout)
    }
}

impl Fingerprinter for ExifTool {
    fn fingerprint(&self, task: &FileTask) -> RenameResult<Fingerprint> {
        let record = self.read_metadata(task.path())?;
        let timestamp = select_date(&record)?;
        tracing::trace!("{}: captured {}", task.path().display(), timestamp);
        Ok(Fingerprint::Timestamp(timestamp))
    }
}

/// exiftool `-j` prints an array holding one object per file
fn parse_records(stdout: &[u8]) -> RenameResult<Map<String, Value>> {
    let mut records: Vec<Map<String, Value>> = serde_json::from_slice(stdout)
        .map_err(|e| RenameError::ExifToolOutput(e.to_string()))?;
    match records.len() {
        1 => Ok(records.remove(0)),
        n => Err(RenameError::ExifToolOutput(format!(
            "expected one record, got {n}"
        ))),
    }
}

fn date_keys(mime_type: &str) -> Option<&'static [&'static str]> {
    if mime_type.starts_with("image/") {
        Some(IMAGE_DATE_KEYS)
    } else if mime_type.starts_with("video/") {
        Some(VIDEO_DATE_KEYS)
    } else {
        None
    }
}

fn select_date(record: &Map<String, Value>) -> RenameResult<NaiveDateTime> {
    let mime_type = record
        .get(MIME_TYPE_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let keys = date_keys(mime_type)
        .ok_or_else(|| RenameError::UnsupportedMimeType(mime_type.to_string()))?;

    let raw = keys
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .ok_or(RenameError::MissingDate)?;
    parse_date(raw)
}

/// Parse an exif date (`YYYY:MM:DD HH:MM:SS[.sss][+hh:mm]`) to second precision
pub fn parse_date(raw: &str) -> RenameResult<NaiveDateTime> {
    let normalized = raw.replacen(':', "-", 2);
    let head = normalized
        .get(..19)
        .ok_or_else(|| RenameError::InvalidDate(raw.to_string()))?;
    NaiveDateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| RenameError::InvalidDate(raw.to_string()))
}
