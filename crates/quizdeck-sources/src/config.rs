//! Configuration file loading and source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdeck_core::manifest::{ALL_PROFILE, DEFAULT_MANIFEST};
use quizdeck_core::traits::QuestionSource;

use crate::directory::DirectorySource;
use crate::http::{HttpSource, DEFAULT_TIMEOUT_SECS};

/// Environment variable that forces a directory source.
pub const DATA_DIR_ENV: &str = "QUIZDECK_DATA_DIR";

/// Where question data is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Directory {
        #[serde(default = "default_data_dir")]
        path: PathBuf,
    },
    Http {
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Directory {
            path: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Where to read question data from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Manifest path inside the source.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Profile loaded when none is given on the command line.
    #[serde(default = "default_profile")]
    pub default_profile: String,
    /// Fixed seed for question selection.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}

fn default_profile() -> String {
    ALL_PROFILE.to_string()
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            manifest: default_manifest(),
            default_profile: default_profile(),
            seed: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
        from = start + value.len();
    }
    result
}

/// Resolve env vars in a source config.
fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Directory { path } => SourceConfig::Directory {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => SourceConfig::Http {
            base_url: resolve_env_vars(base_url),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable override: `QUIZDECK_DATA_DIR`.
pub fn load_config() -> Result<QuizdeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
            )
            .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeckConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        config.source = SourceConfig::Directory {
            path: PathBuf::from(dir),
        };
    }

    config.source = resolve_source_config(&config.source);
    config.manifest = resolve_env_vars(&config.manifest);

    Ok(config)
}

/// Parse a TOML config string without applying environment overrides.
pub fn parse_config(content: &str) -> Result<QuizdeckConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

/// Create a source instance from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn QuestionSource>> {
    match config {
        SourceConfig::Directory { path } => Ok(Box::new(DirectorySource::new(path.clone()))),
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => Ok(Box::new(HttpSource::new(base_url, *timeout_secs)?)),
    }
}
