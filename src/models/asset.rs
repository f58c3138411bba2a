//! Image assets selected for the generated data file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions accepted by the rebuild, in preference order.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "webp", "jpg", "jpeg", "gif"];

/// Rank given to extensions outside the preference list.
const UNRANKED_EXTENSION: u8 = 99;

/// MIME type used when the extension is unknown.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Preference rank of a lowercased extension (lower is better).
pub fn extension_rank(ext: &str) -> u8 {
    ALLOWED_EXTENSIONS
        .iter()
        .position(|allowed| *allowed == ext)
        .map_or(UNRANKED_EXTENSION, |pos| pos as u8)
}

/// MIME type for a lowercased extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => FALLBACK_MIME,
    }
}

/// One record of the generated data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetRecord {
    /// Sequential id such as `op_0001`
    pub id: String,

    /// Display name, unique across records
    pub name: String,

    /// Path relative to the project root, `/`-separated
    pub image: String,

    /// `data:<mime>;base64,<payload>`
    #[serde(rename = "imageData")]
    pub image_data: String,
}

/// An image file considered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub display_name: String,
    pub has_prefix: bool,
    /// Lowercased extension without the dot
    pub extension: String,
}

impl AssetCandidate {
    /// Build a candidate from a file path.
    ///
    /// Returns `None` for files whose extension is not allowed or whose name
    /// is not valid UTF-8.
    pub fn from_path(path: &Path, name_prefix: &str) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let stem = path.file_stem()?.to_str()?;
        let extension = path.extension()?.to_str()?.to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }

        let stripped = match stem.strip_prefix(name_prefix) {
            Some(rest) if !name_prefix.is_empty() => rest,
            _ => stem,
        };
        let display_name = match stripped.trim() {
            "" => stem.to_string(),
            trimmed => trimmed.to_string(),
        };
        let has_prefix = !name_prefix.is_empty() && stem.starts_with(name_prefix);

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            display_name,
            has_prefix,
            extension,
        })
    }

    pub fn rank(&self) -> SelectionRank {
        SelectionRank::of(self)
    }

    pub fn mime(&self) -> &'static str {
        mime_for_extension(&self.extension)
    }
}

/// Sort key deciding which file represents a display name.
///
/// Fields compare in declaration order and the smallest key wins:
/// prefixed files first, then the extension preference
/// (png, webp, jpg, jpeg, gif), then the case-folded file name, and finally
/// the raw file name so that no two distinct files ever tie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionRank {
    prefix_rank: u8,
    extension_rank: u8,
    folded_name: String,
    file_name: String,
}

impl SelectionRank {
    pub fn of(candidate: &AssetCandidate) -> Self {
        Self {
            prefix_rank: if candidate.has_prefix { 0 } else { 1 },
            extension_rank: extension_rank(&candidate.extension),
            folded_name: candidate.file_name.to_lowercase(),
            file_name: candidate.file_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "头像_";

    fn candidate(name: &str) -> AssetCandidate {
        AssetCandidate::from_path(Path::new(name), PREFIX).unwrap()
    }

    #[test]
    fn test_display_name_strips_prefix() {
        let c = candidate("头像_艾雅法拉.png");
        assert_eq!(c.display_name, "艾雅法拉");
        assert!(c.has_prefix);

        let c = candidate("艾雅法拉.webp");
        assert_eq!(c.display_name, "艾雅法拉");
        assert!(!c.has_prefix);
    }

    #[test]
    fn test_display_name_falls_back_to_stem() {
        let c = candidate("头像_.png");
        assert_eq!(c.display_name, "头像_");
    }

    #[test]
    fn test_display_name_trimmed() {
        assert_eq!(candidate("头像_ 能天使 .png").display_name, "能天使");
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        assert!(AssetCandidate::from_path(Path::new("notes.txt"), PREFIX).is_none());
        assert!(AssetCandidate::from_path(Path::new("noext"), PREFIX).is_none());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let c = candidate("A.PNG");
        assert_eq!(c.extension, "png");
        assert_eq!(c.mime(), "image/png");
    }

    #[test]
    fn test_prefix_beats_extension() {
        let prefixed = candidate("头像_艾雅法拉.gif");
        let plain = candidate("艾雅法拉.png");
        assert!(prefixed.rank() < plain.rank());
    }

    #[test]
    fn test_extension_order() {
        let ranks: Vec<_> = ["a.png", "a.webp", "a.jpg", "a.jpeg", "a.gif"]
            .iter()
            .map(|n| candidate(n).rank())
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_file_name_breaks_ties() {
        assert!(candidate("a.png").rank() < candidate("b.png").rank());
        assert!(candidate("B.png").rank() < candidate("b.png").rank());
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_extension("jpeg"), "image/jpeg");
        assert_eq!(mime_for_extension("jpg"), "image/jpeg");
        assert_eq!(mime_for_extension("gif"), "image/gif");
        assert_eq!(mime_for_extension("bmp"), FALLBACK_MIME);
    }

    #[test]
    fn test_record_serializes_camel_case_image_data() {
        let record = AssetRecord {
            id: "op_0001".into(),
            name: "A".into(),
            image: "assets/a.png".into(),
            image_data: "data:image/png;base64,AA==".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["imageData"], "data:image/png;base64,AA==");
    }
}
