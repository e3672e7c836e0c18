//! Trait implemented by the places question data can come from.
//!
//! Implementations live in the `quizdeck-sources` crate.

use async_trait::async_trait;

/// A store of manifest and question files addressed by relative path.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "directory").
    fn name(&self) -> &str;

    /// Fetch the raw contents of `path` (e.g. "ec2-questions.json").
    async fn fetch(&self, path: &str) -> anyhow::Result<String>;
}
