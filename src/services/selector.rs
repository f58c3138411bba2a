// src/services/selector.rs

//! Picks one image file per display name.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::models::AssetCandidate;
use crate::utils::fs;

/// Scans an image directory and resolves display-name collisions.
pub struct AssetSelector {
    name_prefix: String,
}

impl AssetSelector {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
        }
    }

    /// List candidate images in `dir`.
    ///
    /// Fails with `MissingDirectory` when `dir` does not exist. Subdirectories
    /// and files with other extensions are ignored.
    pub async fn scan(&self, dir: &Path) -> Result<Vec<AssetCandidate>> {
        fs::require_dir(dir).await?;

        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            match AssetCandidate::from_path(&path, &self.name_prefix) {
                Some(candidate) => candidates.push(candidate),
                None => log::debug!("Ignoring {}", path.display()),
            }
        }
        Ok(candidates)
    }

    /// Keep the best-ranked candidate for every display name.
    ///
    /// The result is sorted by display name and does not depend on the order
    /// candidates arrive in.
    pub fn select(&self, candidates: Vec<AssetCandidate>) -> Vec<AssetCandidate> {
        let mut best: HashMap<String, AssetCandidate> = HashMap::new();
        for candidate in candidates {
            match best.get(&candidate.display_name) {
                Some(current) if current.rank() <= candidate.rank() => {
                    log::debug!(
                        "{} loses to {} for {:?}",
                        candidate.file_name,
                        current.file_name,
                        candidate.display_name
                    );
                }
                _ => {
                    best.insert(candidate.display_name.clone(), candidate);
                }
            }
        }

        let mut selected: Vec<_> = best.into_values().collect();
        selected.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        selected
    }

    /// Scan `dir` and select one file per display name.
    pub async fn scan_and_select(&self, dir: &Path) -> Result<Vec<AssetCandidate>> {
        let candidates = self.scan(dir).await?;
        Ok(self.select(candidates))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;

    const PREFIX: &str = "头像_";

    fn candidates(names: &[&str]) -> Vec<AssetCandidate> {
        names
            .iter()
            .filter_map(|n| AssetCandidate::from_path(&PathBuf::from(n), PREFIX))
            .collect()
    }

    fn chosen(selected: &[AssetCandidate]) -> Vec<&str> {
        selected.iter().map(|c| c.file_name.as_str()).collect()
    }

    #[test]
    fn test_prefixed_file_wins() {
        let selector = AssetSelector::new(PREFIX);
        let selected = selector.select(candidates(&["头像_艾雅法拉.png", "艾雅法拉.webp"]));
        assert_eq!(chosen(&selected), vec!["头像_艾雅法拉.png"]);
    }

    #[test]
    fn test_selection_independent_of_order() {
        let selector = AssetSelector::new(PREFIX);
        let names = ["能天使.jpg", "能天使.png", "头像_能天使.gif", "头像_能天使.webp"];
        let mut reversed = names;
        reversed.reverse();

        let forward = selector.select(candidates(&names));
        let backward = selector.select(candidates(&reversed));
        assert_eq!(chosen(&forward), vec!["头像_能天使.webp"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_distinct_names_all_kept_sorted() {
        let selector = AssetSelector::new(PREFIX);
        let selected = selector.select(candidates(&["头像_B.png", "A.jpg", "C.gif"]));
        let names: Vec<_> = selected.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_scan_filters_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("头像_A.png"), b"a").unwrap();
        std::fs::write(tmp.path().join("B.JPG"), b"b").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), b"c").unwrap();
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();

        let selector = AssetSelector::new(PREFIX);
        let mut names: Vec<_> = selector
            .scan(tmp.path())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.file_name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["B.JPG", "头像_A.png"]);
    }

    #[tokio::test]
    async fn test_scan_missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let selector = AssetSelector::new(PREFIX);
        let result = selector.scan(&tmp.path().join("missing")).await;
        assert!(matches!(result, Err(AppError::MissingDirectory(_))));
    }
}
