//! HTTP source: question files served as static assets under a base URL.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use quizdeck_core::traits::QuestionSource;

use crate::error::SourceError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches `{base_url}/{path}` with a GET request.
pub struct HttpSource {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    SourceError::NetworkError(format!(
                        "{} not reachable: {e}",
                        self.base_url
                    ))
                } else {
                    SourceError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(path.to_string()).into());
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::NetworkError(format!("failed to read body: {e}")))?;
        tracing::debug!(bytes = body.len(), "fetched");
        Ok(body)
    }
}
