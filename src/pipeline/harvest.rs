// src/pipeline/harvest.rs

//! Scrape-and-download pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, DownloadConfig, DownloadSummary, ImageRef, ScrapeConfig};
use crate::services::{
    Advance, Downloader, HttpFetcher, ImageFetcher, PageController, PageQuery, UrlCollector,
};
use crate::utils::fs;

/// What the page traversal found.
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Item count announced by the page
    pub total_count: usize,
    pub total_pages: usize,
    /// Pages whose sources were collected
    pub pages_collected: usize,
    /// Pages whose switch was never confirmed
    pub pages_unconfirmed: usize,
    pub images: Vec<ImageRef>,
}

/// Result of a full harvest run.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub total_count: usize,
    pub total_pages: usize,
    pub url_collected: usize,
    pub download: DownloadSummary,
    pub output_dir: PathBuf,
}

/// Walk every result page and collect normalized avatar URLs.
pub async fn scrape(config: &ScrapeConfig, page: &dyn PageQuery) -> Result<ScrapeReport> {
    let controller = PageController::new(page, config)?;

    log::info!("Opening {}", config.page_url);
    controller.open(&config.page_url).await?;

    for toggle in &config.toggles {
        controller.ensure_toggle(toggle).await;
    }

    let total_count = controller.total_count().await;
    let total_pages = controller.total_pages().await;
    log::info!("Page reports {total_count} items across {total_pages} pages");

    let mut collector = UrlCollector::new();
    let added = collector.add_all(controller.visible_sources().await);
    log::debug!("Page 1: {added} new images");

    let mut report = ScrapeReport {
        total_count,
        total_pages,
        pages_collected: 1,
        ..ScrapeReport::default()
    };

    for number in 2..=total_pages {
        let advance = controller.advance_to(number).await;
        if !advance.should_collect() {
            log::warn!("Pagination entry {number} not found, skipping page");
            continue;
        }
        match advance {
            Advance::Unconfirmed => {
                report.pages_unconfirmed += 1;
                log::warn!("Page {number} switch unconfirmed, collecting what is visible");
            }
            Advance::ContentChanged { attempts } => {
                log::debug!("Page {number} confirmed by content change after {attempts} checks");
            }
            Advance::Selected { attempts } => {
                log::debug!("Page {number} confirmed by selection after {attempts} checks");
            }
            Advance::Missing => {}
        }

        let added = collector.add_all(controller.visible_sources().await);
        report.pages_collected += 1;
        log::debug!("Page {number}: {added} new images");
    }

    report.images = collector.into_refs();
    log::info!("Collected {} unique image URLs", report.images.len());
    Ok(report)
}

/// Download `images` into the configured output directory.
///
/// Creates the output directory first; failing to do so aborts the run.
pub async fn download(
    config: &DownloadConfig,
    images: Vec<ImageRef>,
    fetcher: Arc<dyn ImageFetcher>,
) -> Result<DownloadSummary> {
    fs::ensure_dir(&config.output_dir).await?;

    log::info!(
        "Downloading {} images with {} workers into {}",
        images.len(),
        config.max_concurrent,
        config.output_dir.display()
    );
    let downloader = Downloader::new(config.clone(), fetcher);
    downloader.run(images).await
}

/// Run the full harvest: scrape every page, then download over HTTP.
pub async fn run_harvest(config: &Config, page: &dyn PageQuery) -> Result<HarvestReport> {
    let scraped = scrape(&config.scrape, page).await?;
    let url_collected = scraped.images.len();

    let fetcher = Arc::new(HttpFetcher::new(&config.download)?);
    let summary = download(&config.download, scraped.images, fetcher).await?;

    let report = HarvestReport {
        total_count: scraped.total_count,
        total_pages: scraped.total_pages,
        url_collected,
        download: summary,
        output_dir: config.download.output_dir.clone(),
    };
    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &HarvestReport) {
    log::info!("page_total_count={}", report.total_count);
    log::info!("page_total_pages={}", report.total_pages);
    log::info!("url_collected={}", report.url_collected);
    log::info!("downloaded={}", report.download.downloaded);
    log::info!("skipped={}", report.download.skipped);
    log::info!("failed={}", report.download.failed);
    log::info!("files_in_dir={}", report.download.files_in_dir);
    log::info!("output_dir={}", report.output_dir.display());
}
