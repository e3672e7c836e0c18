pub mod init;
pub mod play;
pub mod shuffle;
pub mod tags;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use quizdeck_core::loader::ProfileLoader;
use quizdeck_sources::config::load_config_from;
use quizdeck_sources::{create_source, QuizdeckConfig, SourceConfig};

/// Load the config, apply a `--data-dir` override, and build a loader over
/// the resulting source.
pub fn open_loader(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<(QuizdeckConfig, ProfileLoader)> {
    let mut config = load_config_from(config_path)?;
    if let Some(path) = data_dir {
        config.source = SourceConfig::Directory { path };
    }

    let source = create_source(&config.source)?;
    tracing::debug!(source = source.name(), "question source ready");

    let loader = ProfileLoader::new(Arc::from(source)).with_manifest(config.manifest.clone());
    Ok((config, loader))
}

/// Split a comma-separated tag list. Tags match exactly, so each one is
/// kept verbatim, whitespace included; only empty entries are dropped.
pub fn parse_tag_list(s: &str) -> Vec<String> {
    s.split(',')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
