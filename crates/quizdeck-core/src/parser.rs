//! JSON question file parser.
//!
//! Parses question files, validates them for soft issues, and writes them
//! back in the same format.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::LoadError;
use crate::model::{Question, QuestionKind};

/// File name suffix used for question files inside a data directory.
pub const QUESTION_FILE_SUFFIX: &str = "-questions.json";

/// Parse a JSON array of questions. `source` names the file in errors.
pub fn parse_questions_str(content: &str, source: &str) -> Result<Vec<Question>, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Parse {
        file: source.to_string(),
        source: e,
    })
}

/// Read and parse a single question file.
pub fn parse_questions_file(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    Ok(parse_questions_str(&content, &path.display().to_string())?)
}

/// List the `*-questions.json` files in a directory, sorted by name.
pub fn find_question_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        let is_question_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(QUESTION_FILE_SUFFIX));
        if path.is_file() && is_question_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Serialize as JSON indented with four spaces, with a trailing newline.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// A warning from question validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a set of questions for issues that do not prevent loading.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(q.id()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id().to_string()),
                message: format!("duplicate question ID: {}", q.id()),
            });
        }
    }

    for q in questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(q.id().to_string()),
            message,
        };

        if q.tags().is_empty() {
            warnings.push(warn("question has no tags".into()));
        }
        if q.prompt().trim().is_empty() {
            warnings.push(warn("question text is empty".into()));
        }

        match q.kind() {
            QuestionKind::OpenEnded { answer } if answer.trim().is_empty() => {
                warnings.push(warn("answer is empty".into()));
            }
            QuestionKind::MultipleChoice(mc) => {
                let mut seen = HashSet::new();
                for option in mc.options() {
                    if !seen.insert(option.trim()) {
                        warnings.push(warn(format!("duplicate option: {option}")));
                    }
                }
            }
            QuestionKind::OpenEnded { .. } => {}
        }
    }

    warnings
}
