//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Browser driving and page traversal settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Image download settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Data file rebuild settings
    #[serde(default)]
    pub rebuild: RebuildConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scrape.page_url.trim().is_empty() {
            return Err(AppError::validation("scrape.page_url is empty"));
        }
        url::Url::parse(&self.scrape.page_url)?;
        if self.scrape.navigation_timeout_secs == 0 {
            return Err(AppError::validation(
                "scrape.navigation_timeout_secs must be > 0",
            ));
        }
        if self.scrape.poll_attempts == 0 {
            return Err(AppError::validation("scrape.poll_attempts must be > 0"));
        }
        self.scrape.total_count_regex()?;

        if self.download.user_agent.trim().is_empty() {
            return Err(AppError::validation("download.user_agent is empty"));
        }
        if self.download.timeout_secs == 0 {
            return Err(AppError::validation("download.timeout_secs must be > 0"));
        }
        if self.download.max_concurrent == 0 {
            return Err(AppError::validation("download.max_concurrent must be > 0"));
        }
        if self.download.max_filename_chars == 0 {
            return Err(AppError::validation(
                "download.max_filename_chars must be > 0",
            ));
        }

        if self.rebuild.global_binding.trim().is_empty() {
            return Err(AppError::validation("rebuild.global_binding is empty"));
        }
        if self.rebuild.id_width == 0 {
            return Err(AppError::validation("rebuild.id_width must be > 0"));
        }
        Ok(())
    }
}

/// Browser driving and pagination settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Operator list page to open
    #[serde(default = "defaults::page_url")]
    pub page_url: String,

    /// Filter toggles to activate, in order
    #[serde(default = "defaults::toggles")]
    pub toggles: Vec<String>,

    /// Run Chromium without a window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Browser window size (width, height)
    #[serde(default = "defaults::viewport")]
    pub viewport: (u32, u32),

    /// Timeout for the initial navigation
    #[serde(default = "defaults::navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Fixed wait after the page loads
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Fixed wait after each toggle click
    #[serde(default = "defaults::toggle_delay")]
    pub toggle_delay_ms: u64,

    /// Maximum checks after clicking a page number
    #[serde(default = "defaults::poll_attempts")]
    pub poll_attempts: u32,

    /// Delay before each check
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// Regex with one capture group for the total item count
    #[serde(default = "defaults::total_count_pattern")]
    pub total_count_pattern: String,

    #[serde(default)]
    pub selectors: PageSelectors,
}

impl ScrapeConfig {
    /// Compile the total count pattern.
    pub fn total_count_regex(&self) -> Result<Regex> {
        Ok(Regex::new(&self.total_count_pattern)?)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page_url: defaults::page_url(),
            toggles: defaults::toggles(),
            headless: defaults::headless(),
            viewport: defaults::viewport(),
            navigation_timeout_secs: defaults::navigation_timeout(),
            settle_delay_ms: defaults::settle_delay(),
            toggle_delay_ms: defaults::toggle_delay(),
            poll_attempts: defaults::poll_attempts(),
            poll_interval_ms: defaults::poll_interval(),
            total_count_pattern: defaults::total_count_pattern(),
            selectors: PageSelectors::default(),
        }
    }
}

/// CSS selectors for the operator list page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSelectors {
    /// Filter toggle buttons
    #[serde(default = "defaults::toggle_selector")]
    pub toggle: String,

    /// Pagination entries
    #[serde(default = "defaults::pagination_selector")]
    pub pagination: String,

    /// The currently selected pagination entry
    #[serde(default = "defaults::pagination_selected_selector")]
    pub pagination_selected: String,

    /// Avatar images in the result grid
    #[serde(default = "defaults::avatar_selector")]
    pub avatar: String,

    /// Class marking an active toggle
    #[serde(default = "defaults::selected_class")]
    pub selected_class: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            toggle: defaults::toggle_selector(),
            pagination: defaults::pagination_selector(),
            pagination_selected: defaults::pagination_selected_selector(),
            avatar: defaults::avatar_selector(),
            selected_class: defaults::selected_class(),
        }
    }
}

/// Image download settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Flat directory receiving downloaded images
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    /// User-Agent header for image requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Referer header for image requests
    #[serde(default = "defaults::referer")]
    pub referer: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum in-flight downloads
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Idle connections kept per host
    #[serde(default = "defaults::pool_max_idle")]
    pub pool_max_idle: usize,

    /// Maximum characters in a derived file name
    #[serde(default = "defaults::max_filename_chars")]
    pub max_filename_chars: usize,

    /// Extension appended when a derived name has none
    #[serde(default = "defaults::default_extension")]
    pub default_extension: String,

    /// Log progress every N completed items
    #[serde(default = "defaults::progress_every")]
    pub progress_every: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            user_agent: defaults::user_agent(),
            referer: defaults::referer(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            pool_max_idle: defaults::pool_max_idle(),
            max_filename_chars: defaults::max_filename_chars(),
            default_extension: defaults::default_extension(),
            progress_every: defaults::progress_every(),
        }
    }
}

/// Data file rebuild settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RebuildConfig {
    /// Root that `image` paths are made relative to
    #[serde(default = "defaults::project_root")]
    pub project_root: PathBuf,

    /// Image directory, relative to the project root
    #[serde(default = "defaults::source_dir")]
    pub source_dir: PathBuf,

    /// Generated data file, relative to the project root
    #[serde(default = "defaults::output_file")]
    pub output_file: PathBuf,

    /// Global the data file assigns to
    #[serde(default = "defaults::global_binding")]
    pub global_binding: String,

    /// Localized prefix stripped from file stems
    #[serde(default = "defaults::name_prefix")]
    pub name_prefix: String,

    #[serde(default = "defaults::id_prefix")]
    pub id_prefix: String,

    /// Zero-padded digits in record ids
    #[serde(default = "defaults::id_width")]
    pub id_width: usize,
}

impl RebuildConfig {
    /// Absolute-or-rooted path of the image directory.
    pub fn source_path(&self) -> PathBuf {
        self.project_root.join(&self.source_dir)
    }

    /// Absolute-or-rooted path of the generated data file.
    pub fn output_path(&self) -> PathBuf {
        self.project_root.join(&self.output_file)
    }
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            project_root: defaults::project_root(),
            source_dir: defaults::source_dir(),
            output_file: defaults::output_file(),
            global_binding: defaults::global_binding(),
            name_prefix: defaults::name_prefix(),
            id_prefix: defaults::id_prefix(),
            id_width: defaults::id_width(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Scrape defaults
    pub fn page_url() -> String {
        "https://prts.wiki/w/%E5%B9%B2%E5%91%98%E4%B8%80%E8%A7%88?sex=1_%E5%A5%B3%E6%80%A7&_d=2"
            .into()
    }
    pub fn toggles() -> Vec<String> {
        vec!["女性".into(), "头像".into()]
    }
    pub fn headless() -> bool {
        true
    }
    pub fn viewport() -> (u32, u32) {
        (1600, 1200)
    }
    pub fn navigation_timeout() -> u64 {
        120
    }
    pub fn settle_delay() -> u64 {
        2500
    }
    pub fn toggle_delay() -> u64 {
        800
    }
    pub fn poll_attempts() -> u32 {
        40
    }
    pub fn poll_interval() -> u64 {
        200
    }
    pub fn total_count_pattern() -> String {
        r"共(\d+)条".into()
    }

    // Selector defaults
    pub fn toggle_selector() -> String {
        "div.checkbox-container".into()
    }
    pub fn pagination_selector() -> String {
        "#pagination div.checkbox-container".into()
    }
    pub fn pagination_selected_selector() -> String {
        "#pagination div.selected.checkbox-container".into()
    }
    pub fn avatar_selector() -> String {
        "#filter-result img.avatar".into()
    }
    pub fn selected_class() -> String {
        "selected".into()
    }

    // Download defaults
    pub fn output_dir() -> PathBuf {
        PathBuf::from("assets/operators/all")
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn referer() -> String {
        "https://prts.wiki/".into()
    }
    pub fn timeout() -> u64 {
        12
    }
    pub fn max_concurrent() -> usize {
        20
    }
    pub fn pool_max_idle() -> usize {
        48
    }
    pub fn max_filename_chars() -> usize {
        120
    }
    pub fn default_extension() -> String {
        "png".into()
    }
    pub fn progress_every() -> usize {
        50
    }

    // Rebuild defaults
    pub fn project_root() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn source_dir() -> PathBuf {
        PathBuf::from("assets/operators/all")
    }
    pub fn output_file() -> PathBuf {
        PathBuf::from("data/operators.data.js")
    }
    pub fn global_binding() -> String {
        "window.OPERATORS_DATA".into()
    }
    pub fn name_prefix() -> String {
        "头像_".into()
    }
    pub fn id_prefix() -> String {
        "op_".into()
    }
    pub fn id_width() -> usize {
        4
    }
}
