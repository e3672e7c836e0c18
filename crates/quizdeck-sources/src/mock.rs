//! Mock source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use quizdeck_core::traits::QuestionSource;

use crate::error::SourceError;

/// An in-memory source for exercising the loader without touching disk
/// or network.
///
/// Files can be given an artificial delay to simulate slow fetches.
pub struct MockSource {
    /// Map of path → file contents.
    files: HashMap<String, String>,
    /// Per-path fetch delay.
    delays: HashMap<String, Duration>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Paths requested, in call order.
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            delays: HashMap::new(),
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Add a file.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Delay every fetch of `path`.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get every path requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(path.to_string());
        }

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()).into())
    }
}
