use anyhow::{Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub const ENV_PREFIX: &str = "HRENAMER_";

/// Legacy override for the exiftool executable
pub const EXIFTOOL_BIN_ENV: &str = "EXIFTOOL_BIN";

const EXTENSIONS: [&str; 4] = ["toml", "json", "yaml", "yml"];

/// Where a configuration layer comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Env(String),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("<embedded defaults>"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Env(name) => write!(f, "${name}"),
        }
    }
}

fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("hrenamer"))
}

/// Every layer consulted for `custom_config`, lowest priority first
pub fn sources(custom_config: Option<&Path>) -> Vec<ConfigSource> {
    let mut sources = vec![ConfigSource::Defaults];

    match custom_config {
        Some(path) => sources.push(ConfigSource::File(path.to_path_buf())),
        None => {
            if let Some(dir) = user_config_dir() {
                sources.extend(
                    EXTENSIONS
                        .iter()
                        .map(|ext| ConfigSource::File(dir.join(format!("config.{ext}")))),
                );
            }
            sources.extend(
                EXTENSIONS
                    .iter()
                    .map(|ext| ConfigSource::File(PathBuf::from(format!("hrenamer.{ext}")))),
            );
        }
    }

    sources.push(ConfigSource::Env(EXIFTOOL_BIN_ENV.to_string()));
    sources.push(ConfigSource::Env(format!("{ENV_PREFIX}*")));
    sources
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// Build the layered figment. Missing optional files are skipped; a missing
/// `--config` file is an error.
pub fn figment(custom_config: Option<&Path>) -> Result<Figment> {
    if let Some(path) = custom_config {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
    }

    let mut figment = Figment::new();
    for source in sources(custom_config) {
        figment = match source {
            ConfigSource::Defaults => figment.merge(Toml::string(DEFAULT_CONFIG)),
            ConfigSource::File(path) => merge_file(figment, &path),
            ConfigSource::Env(name) if name == EXIFTOOL_BIN_ENV => figment.merge(
                Env::raw()
                    .only(&[EXIFTOOL_BIN_ENV])
                    .map(|_| "exiftool.bin".into()),
            ),
            ConfigSource::Env(_) => figment.merge(Env::prefixed(ENV_PREFIX).split("__")),
        };
    }

    tracing::trace!("config layers: {:?}", figment.metadata().map(|m| &m.name).collect::<Vec<_>>());
    Ok(figment)
}
