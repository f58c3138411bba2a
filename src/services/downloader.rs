// src/services/downloader.rs

//! Bounded-concurrency image downloader.
//!
//! Each reference is attempted exactly once. Per-item failures are counted,
//! never propagated; only a missing output directory aborts the batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{DownloadConfig, DownloadOutcome, DownloadSummary, ImageRef};
use crate::utils::{fs, http};

/// Suffix of in-progress downloads.
const PART_SUFFIX: &str = ".part";

/// Fetches image bytes for a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`ImageFetcher`] over one shared `reqwest` connection pool.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the configured headers and timeout.
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        http::fetch_bytes(&self.client, url)
            .await
            .map_err(|e| AppError::download(url, e))
    }
}

/// Service for downloading collected images into a flat directory.
pub struct Downloader {
    config: DownloadConfig,
    fetcher: Arc<dyn ImageFetcher>,
}

impl Downloader {
    pub fn new(config: DownloadConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Where `image` is stored in the output directory.
    pub fn target_path(&self, image: &ImageRef) -> PathBuf {
        let name = image.file_name(
            self.config.max_filename_chars,
            &self.config.default_extension,
        );
        self.config.output_dir.join(name)
    }

    /// Download every reference through a pool of `max_concurrent` workers.
    ///
    /// The output directory must already exist.
    pub async fn run(&self, images: Vec<ImageRef>) -> Result<DownloadSummary> {
        fs::require_dir(&self.config.output_dir).await?;

        let total = images.len();
        let concurrency = self.config.max_concurrent.max(1);
        let progress_every = self.config.progress_every;

        let mut summary = DownloadSummary::default();
        let mut completed = 0usize;
        let mut downloads = stream::iter(images)
            .map(|image| async move {
                let outcome = self.download_one(&image).await;
                (image, outcome)
            })
            .buffer_unordered(concurrency);

        while let Some((image, outcome)) = downloads.next().await {
            completed += 1;
            summary.record(outcome);
            log::debug!("{outcome}: {image}");

            if progress_every > 0 && completed % progress_every == 0 {
                log::info!("progress={completed}/{total}");
            }
        }

        summary.files_in_dir = fs::count_files(&self.config.output_dir).await?;
        Ok(summary)
    }

    /// Download a single reference and classify the result.
    pub async fn download_one(&self, image: &ImageRef) -> DownloadOutcome {
        let path = self.target_path(image);
        if fs::is_non_empty_file(&path).await {
            return DownloadOutcome::Skipped;
        }

        match self.fetch_to(image, &path).await {
            Ok(()) => DownloadOutcome::Downloaded,
            Err(error) => {
                log::warn!("Failed to download {image}: {error}");
                DownloadOutcome::Failed
            }
        }
    }

    /// Fetch into `<name>.part`, then rename over the target.
    async fn fetch_to(&self, image: &ImageRef, path: &Path) -> Result<()> {
        let bytes = self.fetcher.fetch(image.as_str()).await?;

        let mut part = path.as_os_str().to_owned();
        part.push(PART_SUFFIX);
        let part = PathBuf::from(part);

        if let Err(e) = tokio::fs::write(&part, &bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                log::debug!("Could not remove {}: {cleanup}", part.display());
            }
            return Err(e.into());
        }
        tokio::fs::rename(&part, path).await?;
        Ok(())
    }
}
