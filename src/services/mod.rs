//! Service layer for the tierdeck pipelines.
//!
//! Harvest:
//! - Browser boundary (`PageQuery`, `ChromePage`, `SnapshotPage`)
//! - Page traversal (`PageController`)
//! - URL accumulation (`UrlCollector`)
//! - Image downloads (`Downloader`)
//!
//! Rebuild:
//! - File selection (`AssetSelector`)
//! - Record assembly (`RecordBuilder`)
//! - Data file output (`Emitter`)

#[cfg(feature = "browser")]
mod chrome;
mod collector;
mod controller;
mod downloader;
mod emitter;
pub mod page;
mod records;
mod selector;
pub(crate) mod snapshot;

#[cfg(feature = "browser")]
pub use chrome::ChromePage;
pub use collector::UrlCollector;
pub use controller::{Advance, PageController};
pub use downloader::{Downloader, HttpFetcher, ImageFetcher};
pub use emitter::Emitter;
pub use page::{DomQuery, PageQuery};
pub use records::{RecordBuilder, data_uri};
pub use selector::AssetSelector;
pub use snapshot::SnapshotPage;
