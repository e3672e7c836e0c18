//! The `quizdeck validate` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizdeck_core::parser::{validate_questions, ValidationWarning};

use super::open_loader;

pub async fn execute(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (config, loader) = open_loader(config_path.as_deref(), data_dir)?;

    let manifest = loader
        .load_manifest()
        .await
        .with_context(|| format!("failed to load manifest {}", config.manifest))?;

    println!(
        "Manifest: {} ({} files, profiles: {})",
        config.manifest,
        manifest.files.len(),
        manifest.profile_names().join(", ")
    );

    let mut total_warnings = print_warnings("", &manifest.validate());
    let mut failed = 0;
    let mut first_seen: HashMap<String, String> = HashMap::new();

    for file in &manifest.files {
        let questions = match loader.load_file(file).await {
            Ok(questions) => questions,
            Err(e) => {
                failed += 1;
                println!("{file}: ERROR: {:#}", anyhow::Error::from(e));
                continue;
            }
        };

        println!("{file}: {} questions", questions.len());
        total_warnings += print_warnings("  ", &validate_questions(&questions));

        for q in &questions {
            match first_seen.get(q.id()) {
                Some(other) if other != file => {
                    println!(
                        "  [{}] WARNING: id also defined in {other}; only the first is kept",
                        q.id()
                    );
                    total_warnings += 1;
                }
                Some(_) => {}
                None => {
                    first_seen.insert(q.id().to_string(), file.clone());
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} question file(s) failed to load");
    }

    if total_warnings == 0 {
        println!("All question files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warnings(indent: &str, warnings: &[ValidationWarning]) -> usize {
    for w in warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("{indent}[{id}]"))
            .unwrap_or_else(|| indent.to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    warnings.len()
}
