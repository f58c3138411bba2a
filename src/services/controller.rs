// src/services/controller.rs

//! Page controller for the paginated operator list.
//!
//! Drives a single page strictly in sequence: toggles, pagination metadata,
//! page advancement and avatar extraction. Query failures degrade to defaults
//! so that one broken selector never aborts a scrape.

use std::time::Duration;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::ScrapeConfig;
use crate::services::page::{DomQuery, PageQuery};

/// How a page advance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The requested entry became the selected one
    Selected { attempts: u32 },
    /// The first visible avatar changed
    ContentChanged { attempts: u32 },
    /// Neither signal appeared within the polling budget
    Unconfirmed,
    /// No pagination entry with that number exists
    Missing,
}

impl Advance {
    /// Whether the caller should scrape what is now visible.
    pub fn should_collect(&self) -> bool {
        !matches!(self, Advance::Missing)
    }
}

/// Drives one page of the operator list.
pub struct PageController<'a, P: PageQuery + ?Sized> {
    page: &'a P,
    config: &'a ScrapeConfig,
    count_pattern: Regex,
}

impl<'a, P: PageQuery + ?Sized> PageController<'a, P> {
    pub fn new(page: &'a P, config: &'a ScrapeConfig) -> Result<Self> {
        Ok(Self {
            page,
            config,
            count_pattern: config.total_count_regex()?,
        })
    }

    /// Navigate to `url` and wait for the page to settle.
    pub async fn open(&self, url: &str) -> Result<()> {
        self.page.navigate(url).await?;
        self.page
            .wait(Duration::from_millis(self.config.settle_delay_ms))
            .await;
        Ok(())
    }

    /// Activate the toggle labelled `text` unless it is already active.
    ///
    /// Returns whether the toggle exists. A missing toggle is a no-op.
    pub async fn ensure_toggle(&self, text: &str) -> bool {
        let query = DomQuery::ClickText {
            selector: self.config.selectors.toggle.clone(),
            text: text.to_string(),
            unless_class: Some(self.config.selectors.selected_class.clone()),
        };
        let found = self.query_or(&query, false).await;
        if !found {
            log::warn!("Toggle {text:?} not found, skipping");
        }
        self.page
            .wait(Duration::from_millis(self.config.toggle_delay_ms))
            .await;
        found
    }

    /// Total item count announced on the page, `0` if absent.
    pub async fn total_count(&self) -> usize {
        let text: String = self.query_or(&DomQuery::BodyText, String::new()).await;
        self.count_pattern
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    }

    /// Highest numeric pagination label, `1` without pagination.
    pub async fn total_pages(&self) -> usize {
        let labels: Vec<String> = self
            .query_or(&self.pagination_texts(), Vec::new())
            .await;
        max_page_number(&labels).unwrap_or(1)
    }

    /// Image sources currently visible in the result grid.
    pub async fn visible_sources(&self) -> Vec<String> {
        let query = DomQuery::ImageSources {
            selector: self.config.selectors.avatar.clone(),
        };
        self.query_or(&query, Vec::new()).await
    }

    /// Click pagination entry `number` and wait until the switch shows.
    ///
    /// Polls up to `poll_attempts` times, sleeping `poll_interval_ms` before
    /// each check. Succeeds as soon as the entry is selected or the first
    /// avatar differs from before the click. Giving up is not an error.
    pub async fn advance_to(&self, number: usize) -> Advance {
        let before = self.first_source().await;
        let label = number.to_string();

        let click = DomQuery::ClickText {
            selector: self.config.selectors.pagination.clone(),
            text: label.clone(),
            unless_class: None,
        };
        if !self.query_or(&click, false).await {
            return Advance::Missing;
        }

        let selected = DomQuery::HasText {
            selector: self.config.selectors.pagination_selected.clone(),
            text: label,
        };
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.poll_attempts {
            self.page.wait(interval).await;

            if self.query_or(&selected, false).await {
                return Advance::Selected { attempts: attempt };
            }
            let current = self.first_source().await;
            if current.is_some() && current != before {
                return Advance::ContentChanged { attempts: attempt };
            }
        }

        Advance::Unconfirmed
    }

    async fn first_source(&self) -> Option<String> {
        self.visible_sources().await.into_iter().next()
    }

    fn pagination_texts(&self) -> DomQuery {
        DomQuery::Texts {
            selector: self.config.selectors.pagination.clone(),
        }
    }

    /// Run a query and decode its value, falling back to `default` on error.
    async fn query_or<T: DeserializeOwned>(&self, query: &DomQuery, default: T) -> T {
        let value = match self.page.query(query).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Page query {query:?} failed: {e}");
                return default;
            }
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Page query {query:?} returned an unexpected value: {e}");
            default
        })
    }
}

/// Largest all-digit label.
fn max_page_number(labels: &[String]) -> Option<usize> {
    labels
        .iter()
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
        .max()
}
