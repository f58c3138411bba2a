// src/services/collector.rs

//! Accumulates image references across result pages.

use std::collections::BTreeSet;

use crate::models::ImageRef;

/// Deduplicating set of normalized image references.
#[derive(Debug, Default)]
pub struct UrlCollector {
    refs: BTreeSet<ImageRef>,
}

impl UrlCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert one raw source. Returns whether it was new.
    pub fn add(&mut self, raw: &str) -> bool {
        match ImageRef::normalize(raw) {
            Some(image) => self.refs.insert(image),
            None => false,
        }
    }

    /// Insert every source, returning how many were new.
    pub fn add_all<I, S>(&mut self, sources: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for src in sources {
            if self.add(src.as_ref()) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Collected references in sorted order.
    pub fn into_refs(self) -> Vec<ImageRef> {
        self.refs.into_iter().collect()
    }
}
