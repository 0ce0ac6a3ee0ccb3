use crate::config::ResumeConfig;
use axum::body::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use opentelemetry::{KeyValue, global, metrics::Counter};
use reqwest::{Client, StatusCode};
use thiserror::Error;

pub type ResumeStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

#[derive(Error, Debug)]
pub enum ResumeError {
    #[error("upstream responded with status {0}")]
    Upstream(StatusCode),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
struct Metrics {
    downloads: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("portfolio-server");
        Self {
            downloads: meter
                .u64_counter("resume_downloads_total")
                .with_description("Resume download attempts by outcome")
                .build(),
        }
    }
}

pub struct ResumeDocument {
    pub content_length: Option<u64>,
    pub body: ResumeStream,
}

impl std::fmt::Debug for ResumeDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeDocument").field("content_length", &self.content_length).finish_non_exhaustive()
    }
}

/// Proxies the resume document from its upstream location.
#[derive(Clone, Debug)]
pub struct ResumeService {
    client: Client,
    url: String,
    filename: String,
    metrics: Metrics,
}

impl ResumeService {
    #[must_use]
    pub fn new(client: Client, config: &ResumeConfig) -> Self {
        Self { client, url: config.url.clone(), filename: config.filename.clone(), metrics: Metrics::new() }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Opens a streaming download of the upstream document.
    ///
    /// # Errors
    /// Returns `ResumeError::Upstream` if upstream answers with a non-success
    /// status and `ResumeError::Transport` if it cannot be reached.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn fetch(&self) -> Result<ResumeDocument, ResumeError> {
        let outcome = self.open().await;
        let label = match &outcome {
            Ok(_) => "ok",
            Err(ResumeError::Upstream(_)) => "not_found",
            Err(ResumeError::Transport(_)) => "error",
        };
        self.metrics.downloads.add(1, &[KeyValue::new("outcome", label)]);
        outcome
    }

    async fn open(&self) -> Result<ResumeDocument, ResumeError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ResumeError::Upstream(status));
        }

        let content_length = resp.content_length();
        let body = resp.bytes_stream().map(|chunk| chunk.map_err(std::io::Error::other)).boxed();
        Ok(ResumeDocument { content_length, body })
    }
}
