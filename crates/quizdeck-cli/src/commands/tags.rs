//! The `quizdeck tags` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizdeck_core::Question;

use super::open_loader;

pub async fn execute(
    profile: Option<String>,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, loader) = open_loader(config_path.as_deref(), data_dir)?;
    let profile = profile.unwrap_or_else(|| config.default_profile.clone());

    let manifest = loader.load_manifest().await?;
    let questions = loader
        .load_profile(&manifest, &profile)
        .await
        .with_context(|| format!("failed to load profile {profile}"))?
        .into_corpus()
        .unwrap_or_default();

    let counts = tag_counts(&questions);
    if counts.is_empty() {
        println!("Profile {profile} has no tagged questions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Tag", "Questions"]);
    for (tag, count) in &counts {
        table.add_row(vec![Cell::new(tag), Cell::new(count)]);
    }

    println!("Profile {profile}: {} questions", questions.len());
    println!("{table}");
    Ok(())
}

/// Number of questions carrying each tag.
fn tag_counts(questions: &[Question]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for q in questions {
        for tag in q.tags() {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    counts
}
