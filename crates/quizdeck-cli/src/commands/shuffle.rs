//! The `quizdeck shuffle` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizdeck_core::parser::find_question_files;
use quizdeck_core::shuffle::{shuffle_questions_json, ShuffleStats};

pub fn execute(file: Option<PathBuf>, data_dir: PathBuf, seed: Option<u64>) -> Result<()> {
    let files = match file {
        Some(path) => vec![path],
        None => find_question_files(&data_dir)?,
    };

    if files.is_empty() {
        println!("No question files found in {}.", data_dir.display());
        return Ok(());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut totals = ShuffleStats::default();
    for path in &files {
        let stats = shuffle_file(path, &mut rng)?;
        println!(
            "{}: shuffled {} of {} questions",
            path.display(),
            stats.shuffled,
            stats.total
        );
        totals.total += stats.total;
        totals.multiple_choice += stats.multiple_choice;
        totals.shuffled += stats.shuffled;
    }

    println!(
        "\n{} file(s), {} questions, {} multiple-choice shuffled.",
        files.len(),
        totals.total,
        totals.shuffled
    );
    Ok(())
}

/// Shuffle one file in place. The file is parsed in full before it is
/// rewritten, so a malformed file is left untouched.
fn shuffle_file(path: &Path, rng: &mut StdRng) -> Result<ShuffleStats> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let (shuffled, stats) = shuffle_questions_json(&content, &path.display().to_string(), rng)?;
    std::fs::write(path, shuffled)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), shuffled = stats.shuffled, "file shuffled");
    Ok(stats)
}
