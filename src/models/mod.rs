// src/models/mod.rs

//! Domain models shared by the harvest and rebuild pipelines.

mod asset;
mod config;
mod image;
mod outcome;

// Re-export all public types
pub use asset::{
    ALLOWED_EXTENSIONS, AssetCandidate, AssetRecord, FALLBACK_MIME, SelectionRank,
    extension_rank, mime_for_extension,
};
pub use config::{Config, DownloadConfig, PageSelectors, RebuildConfig, ScrapeConfig};
pub use image::{FALLBACK_FILE_NAME, ImageRef};
pub use outcome::{DownloadOutcome, DownloadSummary};
