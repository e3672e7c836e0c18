//! Local directory source.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use quizdeck_core::traits::QuestionSource;

use crate::error::SourceError;

/// Reads files relative to a root directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SourceError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl QuestionSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, path: &str) -> anyhow::Result<String> {
        let full = self.resolve(path)?;
        let content = tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(full.display().to_string())
            } else {
                SourceError::Io {
                    path: full.display().to_string(),
                    source: e,
                }
            }
        })?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_relative_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sets")).unwrap();
        std::fs::write(dir.path().join("sets/s3-questions.json"), "[]").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.fetch("sets/s3-questions.json").await.unwrap(), "[]");
        assert_eq!(source.fetch("./sets/s3-questions.json").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        let err = source.fetch("nope.json").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("data"));
        for path in ["../secret.json", "/etc/passwd", "a/../../b.json"] {
            let err = source.fetch(path).await.unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<SourceError>(),
                    Some(SourceError::InvalidPath(_))
                ),
                "{path} should be rejected"
            );
        }
    }
}
