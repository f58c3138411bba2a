//! tierdeck CLI
//!
//! `harvest` scrapes and downloads operator avatars, `rebuild` regenerates the
//! board's data file from the downloaded images.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tierdeck::{
    error::Result,
    models::Config,
    pipeline,
    services::{PageQuery, SnapshotPage},
};

/// tierdeck - Operator avatar harvester and data file builder
#[derive(Parser, Debug)]
#[command(
    name = "tierdeck",
    version,
    about = "Operator avatar harvester and tier board data builder"
)]

struct Cli {
    /// Path to the TOML configuration (defaults apply when missing)
    #[arg(short, long, default_value = "tierdeck.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape avatar URLs from the operator list and download them
    Harvest {
        /// Operator list page to open
        #[arg(long)]
        url: Option<String>,

        /// Directory receiving the images
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Saved result pages to use instead of a live browser, in page order
        #[arg(long)]
        snapshot: Vec<PathBuf>,
    },

    /// Regenerate the data file from the image directory
    Rebuild {
        /// Project root that image paths are relative to
        #[arg(long)]
        root: Option<PathBuf>,

        /// Image directory, relative to the root
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output data file, relative to the root
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the config file, falling back to defaults only when it is absent.
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let config = Config::load(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    } else {
        log::info!("No config at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

/// Read saved HTML pages for an offline harvest.
fn load_snapshot(paths: &[PathBuf], config: &Config) -> Result<SnapshotPage> {
    let pages = paths
        .iter()
        .map(std::fs::read_to_string)
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok(SnapshotPage::new(pages, &config.scrape.selectors))
}

#[cfg(feature = "browser")]
async fn open_page(snapshot: &[PathBuf], config: &Config) -> Result<Box<dyn PageQuery>> {
    if !snapshot.is_empty() {
        return Ok(Box::new(load_snapshot(snapshot, config)?));
    }
    let page = tierdeck::services::ChromePage::launch(&config.scrape).await?;
    Ok(Box::new(page))
}

#[cfg(not(feature = "browser"))]
async fn open_page(snapshot: &[PathBuf], config: &Config) -> Result<Box<dyn PageQuery>> {
    if snapshot.is_empty() {
        return Err(tierdeck::error::AppError::config(
            "built without the `browser` feature; pass --snapshot pages",
        ));
    }
    Ok(Box::new(load_snapshot(snapshot, config)?))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(&cli.config)?;

    match cli.command {
        Command::Harvest {
            url,
            output_dir,
            snapshot,
        } => {
            if let Some(url) = url {
                config.scrape.page_url = url;
            }
            if let Some(dir) = output_dir {
                config.download.output_dir = dir;
            }
            config.validate()?;

            let page = open_page(&snapshot, &config).await?;
            let report = pipeline::run_harvest(&config, &*page).await?;

            if report.download.failed > 0 {
                log::warn!("{} downloads failed", report.download.failed);
            }
            log::info!("Harvest complete!");
        }

        Command::Rebuild {
            root,
            source,
            output,
        } => {
            if let Some(root) = root {
                config.rebuild.project_root = root;
            }
            if let Some(source) = source {
                config.rebuild.source_dir = source;
            }
            if let Some(output) = output {
                config.rebuild.output_file = output;
            }
            config.validate()?;

            pipeline::run_rebuild(&config.rebuild).await?;
            log::info!("Rebuild complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
