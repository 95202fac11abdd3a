//! Source line collection
//!
//! Sources are `http(s)://` URLs or local file paths. Downloads run
//! concurrently up to the configured limit; results are concatenated in
//! source order. A failed source is logged and contributes no lines.

use anyhow::{Context, Result};
use dashmap::DashMap;
use domsift_core::config::Settings;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OnceCell, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Raw lines of one source, shared between rule sets
type Lines = Arc<Vec<String>>;

/// Downloads and reads sources, caching each one for the whole run.
///
/// Each source owns a once-cell, so concurrent requests for the same
/// source share one download.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    limit: Arc<Semaphore>,
    cache: Arc<DashMap<String, Arc<OnceCell<Lines>>>>,
}

impl Fetcher {
    /// Build an HTTP client from the download settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.download_timeout())
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            limit: Arc::new(Semaphore::new(settings.download_concurrency.max(1))),
            cache: Arc::new(DashMap::new()),
        })
    }

    /// Lines of every source, concatenated in the given order
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn collect(&self, sources: &[String]) -> Vec<String> {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.iter().enumerate() {
            let fetcher = self.clone();
            let source = source.clone();
            tasks.spawn(async move { (index, fetcher.load(&source).await) });
        }

        let mut slots: Vec<Option<Lines>> = vec![None; sources.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, lines)) => slots[index] = Some(lines),
                Err(e) => warn!(error = %e, "Source task failed"),
            }
        }

        let total = slots.iter().flatten().map(|l| l.len()).sum();
        let mut lines = Vec::with_capacity(total);
        for chunk in slots.into_iter().flatten() {
            lines.extend(chunk.iter().cloned());
        }
        lines
    }

    async fn load(&self, source: &str) -> Lines {
        // The map guard must be gone before awaiting
        let cell = Arc::clone(&*self.cache.entry(source.to_string()).or_default());
        if let Some(lines) = cell.get() {
            debug!(source, "Cache hit");
            return Arc::clone(lines);
        }

        let lines = cell
            .get_or_init(|| async {
                let lines = if is_url(source) {
                    self.download(source).await
                } else {
                    read_local(Path::new(source)).await
                };
                Arc::new(lines)
            })
            .await;
        Arc::clone(lines)
    }

    async fn download(&self, url: &str) -> Vec<String> {
        let Ok(_permit) = self.limit.acquire().await else {
            return Vec::new();
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Download failed");
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Download failed");
            return Vec::new();
        }

        match response.text().await {
            Ok(body) => {
                let lines = split_lines(&body);
                info!(url, lines = lines.len(), "Downloaded");
                lines
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to read response body");
                Vec::new()
            }
        }
    }
}

/// Read a local list; a missing or unreadable file yields no lines
pub async fn read_local(path: &Path) -> Vec<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => {
            let lines = split_lines(&body);
            debug!(path = %path.display(), lines = lines.len(), "Read local list");
            lines
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read local list");
            Vec::new()
        }
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn split_lines(body: &str) -> Vec<String> {
    body.lines().map(str::to_string).collect()
}
