// src/services/chrome.rs

//! Live page driven through a headless Chromium tab.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ScrapeConfig;
use crate::services::page::{DomQuery, PageQuery};

/// A [`PageQuery`] backed by one Chromium tab.
///
/// `headless_chrome` is blocking, so every call runs on tokio's blocking
/// pool. Dropping the page closes the browser process.
pub struct ChromePage {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Launch Chromium and open a tab configured from `config`.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::launch_blocking(&config))
            .await
            .map_err(AppError::browser)?
    }

    fn launch_blocking(config: &ScrapeConfig) -> Result<Self> {
        let options = LaunchOptions {
            headless: config.headless,
            window_size: Some(config.viewport),
            ..Default::default()
        };
        let browser = Browser::new(options).map_err(AppError::browser)?;
        let tab = browser.new_tab().map_err(AppError::browser)?;
        tab.set_default_timeout(Duration::from_secs(config.navigation_timeout_secs));

        log::debug!(
            "Launched Chromium (headless={}, viewport={}x{})",
            config.headless,
            config.viewport.0,
            config.viewport.1
        );
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    async fn on_tab<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || f(&tab))
            .await
            .map_err(AppError::browser)?
    }
}

#[async_trait]
impl PageQuery for ChromePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        self.on_tab(move |tab| {
            tab.navigate_to(&url).map_err(AppError::browser)?;
            tab.wait_until_navigated().map_err(AppError::browser)?;
            Ok(())
        })
        .await
    }

    async fn query(&self, query: &DomQuery) -> Result<Value> {
        // Remote objects only carry primitives by value, so arrays come back
        // as a JSON string.
        let script = format!("JSON.stringify({})", query.to_script());
        let object = self
            .on_tab(move |tab| tab.evaluate(&script, false).map_err(AppError::browser))
            .await?;

        match object.value {
            Some(Value::String(json)) => Ok(serde_json::from_str(&json)?),
            Some(other) => Ok(other),
            None => Ok(Value::Null),
        }
    }
}
