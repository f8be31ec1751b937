//! Configuration management for hrenamer
//!
//! Layered with figment (see [`core`]) and extracted once at startup into
//! [`RenamerConfig`]. Nothing reads configuration after that point.

pub mod core;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rename::HashAlgorithm;
pub use self::core::ConfigSource;

/// Main configuration structure for hrenamer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerConfig {
    pub parallel: ParallelConfig,
    pub hash: HashConfig,
    pub exiftool: ExifToolConfig,
    pub output: OutputConfig,
}

/// Worker pool sizing when `--jobs` is not given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Maximum number of worker threads (0 = no limit)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 100,
        }
    }
}

/// Defaults for the `hash` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub algorithm: HashAlgorithm,
    pub length: usize,
    pub extension: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifToolConfig {
    pub bin: String,
}

impl Default for ExifToolConfig {
    fn default() -> Self {
        Self {
            bin: "exiftool".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl RenamerConfig {
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let config: RenamerConfig = self::core::figment(custom_config)?
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        tracing::debug!("loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=100).contains(&self.parallel.thread_percentage),
            "parallel.thread_percentage must be between 1 and 100, got {}",
            self.parallel.thread_percentage
        );
        ensure!(
            !self.exiftool.bin.trim().is_empty(),
            "exiftool.bin must not be empty"
        );
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
