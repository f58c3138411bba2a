// src/services/emitter.rs

//! Writes the generated, script-loadable data file.

use std::path::Path;

use crate::error::Result;
use crate::models::AssetRecord;
use crate::utils::fs;

/// Serializes records as `<binding> = <json>;`.
pub struct Emitter<'a> {
    global_binding: &'a str,
}

impl<'a> Emitter<'a> {
    pub fn new(global_binding: &'a str) -> Self {
        Self { global_binding }
    }

    /// Render the whole artifact.
    ///
    /// The JSON is indented by two spaces and pure ASCII: every other
    /// character is written as a `\uXXXX` escape.
    pub fn render(&self, records: &[AssetRecord]) -> Result<String> {
        let json = serde_json::to_string_pretty(records)?;
        Ok(format!("{} = {};\n", self.global_binding, escape_non_ascii(&json)))
    }

    /// Render and write to `path`, replacing any previous version.
    pub async fn write(&self, path: &Path, records: &[AssetRecord]) -> Result<()> {
        let payload = self.render(records)?;
        fs::write_atomic(path, payload.as_bytes()).await
    }
}

/// Escape non-ASCII characters as JSON `\u` sequences.
///
/// Only valid on serialized JSON, where such characters can appear inside
/// string literals alone.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}
