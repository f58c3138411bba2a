//! Pipeline entry points.
//!
//! - `run_harvest`: Scrape avatar URLs from the wiki and download them
//! - `run_rebuild`: Regenerate the data file from downloaded images

pub mod harvest;
pub mod rebuild;

pub use harvest::{HarvestReport, ScrapeReport, download, run_harvest, scrape};
pub use rebuild::{RebuildReport, run_rebuild};
