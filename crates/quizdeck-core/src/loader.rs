//! Profile loader.
//!
//! Turns a manifest and a profile name into a corpus by fetching every
//! constituent file concurrently. A load either yields every question of
//! the profile or fails as a whole. When a newer load was started on the
//! same loader before an older one finished, the older one reports
//! [`LoadOutcome::Superseded`] and its data is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::instrument;

use crate::error::LoadError;
use crate::manifest::{Manifest, DEFAULT_MANIFEST};
use crate::model::Question;
use crate::parser::parse_questions_str;
use crate::traits::QuestionSource;

/// Result of a profile load that did not fail.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The full corpus of the profile, in manifest order.
    Ready(Vec<Question>),
    /// A later load started before this one completed.
    Superseded,
}

impl LoadOutcome {
    pub fn into_corpus(self) -> Option<Vec<Question>> {
        match self {
            LoadOutcome::Ready(corpus) => Some(corpus),
            LoadOutcome::Superseded => None,
        }
    }
}

pub struct ProfileLoader {
    source: Arc<dyn QuestionSource>,
    manifest_path: String,
    generation: AtomicU64,
}

impl ProfileLoader {
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            manifest_path: DEFAULT_MANIFEST.to_string(),
            generation: AtomicU64::new(0),
        }
    }

    /// Use a manifest other than `manifest.json`.
    pub fn with_manifest(mut self, path: impl Into<String>) -> Self {
        self.manifest_path = path.into();
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn load_manifest(&self) -> Result<Manifest, LoadError> {
        let content = self
            .source
            .fetch(&self.manifest_path)
            .await
            .map_err(|e| LoadError::Fetch {
                file: self.manifest_path.clone(),
                source: e.into(),
            })?;
        Manifest::from_json(&content, &self.manifest_path)
    }

    /// Fetch and parse a single question file.
    pub async fn load_file(&self, file: &str) -> Result<Vec<Question>, LoadError> {
        let content = self
            .source
            .fetch(file)
            .await
            .map_err(|e| LoadError::Fetch {
                file: file.to_string(),
                source: e.into(),
            })?;
        parse_questions_str(&content, file)
    }

    /// Fetch and parse every file of `profile`.
    #[instrument(skip(self, manifest))]
    pub async fn load_profile(
        &self,
        manifest: &Manifest,
        profile: &str,
    ) -> Result<LoadOutcome, LoadError> {
        let files = manifest.resolve_profile(profile)?;
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let parts = try_join_all(files.iter().map(|file| self.load_file(file))).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!("load superseded by a newer request");
            return Ok(LoadOutcome::Superseded);
        }

        let corpus: Vec<Question> = parts?.into_iter().flatten().collect();
        tracing::info!(
            files = files.len(),
            questions = corpus.len(),
            "profile loaded"
        );
        Ok(LoadOutcome::Ready(corpus))
    }
}
