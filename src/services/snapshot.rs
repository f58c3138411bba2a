// src/services/snapshot.rs

//! Offline page backed by saved HTML documents.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::PageSelectors;
use crate::services::page::{DomQuery, PageQuery};
use crate::utils::url::resolve_opt;

/// A [`PageQuery`] over saved result pages.
///
/// Document `i` holds result page `i + 1`. Clicking a pagination entry whose
/// text is `n` switches to document `n - 1`; every other click is accepted
/// without changing anything, since static markup has no script behind it.
pub struct SnapshotPage {
    pages: Vec<String>,
    pagination_selector: String,
    current: AtomicUsize,
    base_url: Mutex<Option<Url>>,
}

impl SnapshotPage {
    /// Create a snapshot page from HTML documents in page order.
    pub fn new(pages: Vec<String>, selectors: &PageSelectors) -> Self {
        Self {
            pages,
            pagination_selector: selectors.pagination.clone(),
            current: AtomicUsize::new(0),
            base_url: Mutex::new(None),
        }
    }

    /// Index of the document currently shown.
    pub fn current_page(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| AppError::browser(format!("snapshot state poisoned: {e}")))
    }

    fn document(&self) -> Html {
        let html = self
            .pages
            .get(self.current_page())
            .map(String::as_str)
            .unwrap_or("");
        Html::parse_document(html)
    }

    fn evaluate(&self, query: &DomQuery) -> Result<Value> {
        let document = self.document();

        match query {
            DomQuery::BodyText => {
                let text = match Selector::parse("body") {
                    Ok(body) => document
                        .select(&body)
                        .next()
                        .map(|el| el.text().collect::<String>())
                        .unwrap_or_default(),
                    Err(_) => document.root_element().text().collect(),
                };
                Ok(Value::String(text))
            }
            DomQuery::Texts { selector } => {
                let selector = parse_selector(selector)?;
                let texts = document
                    .select(&selector)
                    .map(|el| Value::String(trimmed_text(&el)))
                    .collect();
                Ok(Value::Array(texts))
            }
            DomQuery::ImageSources { selector } => {
                let selector = parse_selector(selector)?;
                let base = self.base_url()?;
                let sources = document
                    .select(&selector)
                    .filter_map(|el| el.value().attr("src"))
                    .map(str::trim)
                    .filter(|src| !src.is_empty())
                    .map(|src| Value::String(resolve_opt(base.as_ref(), src)))
                    .collect();
                Ok(Value::Array(sources))
            }
            DomQuery::ClickText {
                selector,
                text,
                unless_class,
            } => {
                let parsed = parse_selector(selector)?;
                let Some(element) = document
                    .select(&parsed)
                    .find(|el| trimmed_text(el) == *text)
                else {
                    return Ok(Value::Bool(false));
                };

                let already_active = unless_class
                    .as_deref()
                    .is_some_and(|class| element.value().classes().any(|c| c == class));
                if !already_active && *selector == self.pagination_selector {
                    self.switch_to(text);
                }
                Ok(Value::Bool(true))
            }
            DomQuery::HasText { selector, text } => {
                let selector = parse_selector(selector)?;
                let found = document.select(&selector).any(|el| trimmed_text(&el) == *text);
                Ok(Value::Bool(found))
            }
        }
    }

    fn switch_to(&self, label: &str) {
        if let Ok(number) = label.parse::<usize>() {
            if (1..=self.pages.len()).contains(&number) {
                self.current.store(number - 1, Ordering::SeqCst);
            }
        }
    }
}

#[async_trait]
impl PageQuery for SnapshotPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        let mut base = self
            .base_url
            .lock()
            .map_err(|e| AppError::browser(format!("snapshot state poisoned: {e}")))?;
        *base = Some(parsed);
        self.current.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, query: &DomQuery) -> Result<Value> {
        self.evaluate(query)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn trimmed_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
