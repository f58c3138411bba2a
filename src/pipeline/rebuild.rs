// src/pipeline/rebuild.rs

//! Data file rebuild pipeline.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::RebuildConfig;
use crate::services::{AssetSelector, Emitter, RecordBuilder};

/// Result of a rebuild run.
#[derive(Debug, Clone)]
pub struct RebuildReport {
    pub record_count: usize,
    pub output_file: PathBuf,
}

/// Regenerate the data file from the image directory.
///
/// A missing source directory aborts the run before anything is written.
pub async fn run_rebuild(config: &RebuildConfig) -> Result<RebuildReport> {
    let source = config.source_path();
    log::info!("Scanning {}", source.display());

    let selector = AssetSelector::new(config.name_prefix.as_str());
    let selected = selector.scan_and_select(&source).await?;
    log::debug!("Selected {} files", selected.len());

    let records = RecordBuilder::new(config).build(selected).await?;

    let output_file = config.output_path();
    Emitter::new(&config.global_binding)
        .write(&output_file, &records)
        .await?;

    log::info!(
        "Generated {} with {} operators.",
        output_file.display(),
        records.len()
    );
    Ok(RebuildReport {
        record_count: records.len(),
        output_file,
    })
}
