// src/services/records.rs

//! Turns selected image files into data file records.

use std::path::{Component, Path};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{AppError, Result};
use crate::models::{AssetCandidate, AssetRecord, RebuildConfig};

/// Builds [`AssetRecord`]s with embedded image data.
pub struct RecordBuilder<'a> {
    config: &'a RebuildConfig,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(config: &'a RebuildConfig) -> Self {
        Self { config }
    }

    /// Build records for `selected`, ordered case-insensitively by name.
    pub async fn build(&self, mut selected: Vec<AssetCandidate>) -> Result<Vec<AssetRecord>> {
        selected.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let mut records = Vec::with_capacity(selected.len());
        for (index, candidate) in selected.into_iter().enumerate() {
            records.push(self.build_one(index + 1, candidate).await?);
        }
        Ok(records)
    }

    async fn build_one(&self, ordinal: usize, candidate: AssetCandidate) -> Result<AssetRecord> {
        let bytes = tokio::fs::read(&candidate.path).await?;
        Ok(AssetRecord {
            id: self.format_id(ordinal),
            image: self.relative_path(&candidate.path)?,
            image_data: data_uri(candidate.mime(), &bytes),
            name: candidate.display_name,
        })
    }

    /// Zero-padded id for the `ordinal`-th record (1-based).
    pub fn format_id(&self, ordinal: usize) -> String {
        format!(
            "{}{:0width$}",
            self.config.id_prefix,
            ordinal,
            width = self.config.id_width
        )
    }

    /// `path` relative to the project root, `/`-separated.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = path.strip_prefix(&self.config.project_root).map_err(|_| {
            AppError::validation(format!(
                "{} is outside the project root {}",
                path.display(),
                self.config.project_root.display()
            ))
        })?;

        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        Ok(parts.join("/"))
    }
}

/// Encode bytes as a `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn config(root: &Path) -> RebuildConfig {
        RebuildConfig {
            project_root: root.to_path_buf(),
            ..RebuildConfig::default()
        }
    }

    #[test]
    fn test_format_id() {
        let config = RebuildConfig::default();
        let builder = RecordBuilder::new(&config);
        assert_eq!(builder.format_id(1), "op_0001");
        assert_eq!(builder.format_id(123), "op_0123");
        assert_eq!(builder.format_id(12345), "op_12345");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"hello"), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let config = config(Path::new("/srv/board"));
        let builder = RecordBuilder::new(&config);
        let path = PathBuf::from("/srv/board/assets/operators/all/a.png");
        assert_eq!(
            builder.relative_path(&path).unwrap(),
            "assets/operators/all/a.png"
        );
    }

    #[test]
    fn test_relative_path_from_dot_root() {
        let config = RebuildConfig::default();
        let builder = RecordBuilder::new(&config);
        let path = config.source_path().join("a.png");
        assert_eq!(
            builder.relative_path(&path).unwrap(),
            "assets/operators/all/a.png"
        );
    }

    #[test]
    fn test_relative_path_outside_root() {
        let config = config(Path::new("/srv/board"));
        let builder = RecordBuilder::new(&config);
        assert!(builder.relative_path(Path::new("/tmp/a.png")).is_err());
    }

    #[tokio::test]
    async fn test_build_orders_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let dir = config.source_path();
        std::fs::create_dir_all(&dir).unwrap();

        let mut selected = Vec::new();
        for (name, content) in [("beta.png", "b"), ("Alpha.gif", "a"), ("头像_gamma.webp", "g")] {
            let path = dir.join(name);
            std::fs::write(&path, content).unwrap();
            selected.push(AssetCandidate::from_path(&path, &config.name_prefix).unwrap());
        }

        let records = RecordBuilder::new(&config).build(selected).await.unwrap();
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.id.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("op_0001", "Alpha"), ("op_0002", "beta"), ("op_0003", "gamma")]
        );
        assert_eq!(records[0].image_data, "data:image/gif;base64,YQ==");
        assert_eq!(records[2].image, "assets/operators/all/头像_gamma.webp");
    }
}
