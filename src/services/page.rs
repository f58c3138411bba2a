// src/services/page.rs

//! The browser automation boundary.
//!
//! The scrape pipeline never talks to a browser engine directly. It describes
//! each DOM interaction as a [`DomQuery`] and hands it to a [`PageQuery`]
//! implementation: a live Chromium tab ([`super::ChromePage`]) or saved HTML
//! ([`super::SnapshotPage`]).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A DOM interaction the page controller needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomQuery {
    /// Visible text of the document body. Yields a string.
    BodyText,

    /// Trimmed text of every element matching `selector`. Yields a string array.
    Texts { selector: String },

    /// `currentSrc || src` of every matching image, empties dropped.
    /// Yields a string array.
    ImageSources { selector: String },

    /// Click the first element matching `selector` whose trimmed text equals
    /// `text`, unless it already has `unless_class`. Yields `true` when the
    /// element exists.
    ClickText {
        selector: String,
        text: String,
        unless_class: Option<String>,
    },

    /// Whether any element matching `selector` has trimmed text `text`.
    /// Yields a boolean.
    HasText { selector: String, text: String },
}

impl DomQuery {
    /// Render the query as a self-contained JavaScript expression.
    pub fn to_script(&self) -> String {
        match self {
            DomQuery::BodyText => {
                "(document.body ? document.body.innerText : '')".to_string()
            }
            DomQuery::Texts { selector } => format!(
                "[...document.querySelectorAll({sel})].map(el => (el.textContent || '').trim())",
                sel = js_str(selector),
            ),
            DomQuery::ImageSources { selector } => format!(
                "[...document.querySelectorAll({sel})]\
                 .map(img => img.currentSrc || img.src || '')\
                 .filter(Boolean)",
                sel = js_str(selector),
            ),
            DomQuery::ClickText {
                selector,
                text,
                unless_class,
            } => format!(
                "(() => {{ \
                   const el = [...document.querySelectorAll({sel})]\
                     .find(el => (el.textContent || '').trim() === {text}); \
                   if (!el) return false; \
                   const cls = {cls}; \
                   if (!(cls && el.classList.contains(cls))) el.click(); \
                   return true; \
                 }})()",
                sel = js_str(selector),
                text = js_str(text),
                cls = js_str(unless_class.as_deref().unwrap_or("")),
            ),
            DomQuery::HasText { selector, text } => format!(
                "[...document.querySelectorAll({sel})]\
                 .some(el => (el.textContent || '').trim() === {text})",
                sel = js_str(selector),
                text = js_str(text),
            ),
        }
    }
}

/// Quote a string as a JavaScript literal.
fn js_str(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

/// A controllable page: navigate, evaluate DOM queries, wait.
#[async_trait]
pub trait PageQuery: Send + Sync {
    /// Load `url` and wait for navigation to finish.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate a query against the live DOM.
    async fn query(&self, query: &DomQuery) -> Result<Value>;

    /// Suspend for a fixed duration.
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_quoted() {
        let script = DomQuery::Texts {
            selector: "#pagination div.checkbox-container".into(),
        }
        .to_script();
        assert!(script.contains(r##"querySelectorAll("#pagination div.checkbox-container")"##));
    }

    #[test]
    fn test_text_is_escaped() {
        let script = DomQuery::HasText {
            selector: "div".into(),
            text: "a\"b".into(),
        }
        .to_script();
        assert!(script.contains(r#"=== "a\"b""#));
    }

    #[test]
    fn test_click_without_class_always_clicks() {
        let script = DomQuery::ClickText {
            selector: "div".into(),
            text: "2".into(),
            unless_class: None,
        }
        .to_script();
        assert!(script.contains(r#"const cls = "";"#));
    }

    #[test]
    fn test_click_with_class_guard() {
        let script = DomQuery::ClickText {
            selector: "div.checkbox-container".into(),
            text: "女性".into(),
            unless_class: Some("selected".into()),
        }
        .to_script();
        assert!(script.contains(r#"const cls = "selected";"#));
        assert!(script.contains(r#"=== "女性""#));
    }
}
