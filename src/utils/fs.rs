// src/utils/fs.rs

//! File system utilities.

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Characters rejected in file names on common filesystems.
const INVALID_FILE_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Placeholder files ignored when counting directory contents.
const PLACEHOLDER_FILES: &[&str] = &[".gitkeep"];

/// Make a candidate name safe to use as a file name.
///
/// Each run of invalid characters collapses into a single `_`, and the result
/// is limited to `max_chars` characters.
pub fn sanitize_file_name(name: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.trim().chars() {
        if INVALID_FILE_NAME_CHARS.contains(&c) {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out.chars().take(max_chars).collect()
}

/// Ensure a directory exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Fail with `MissingDirectory` unless `path` is an existing directory.
pub async fn require_dir(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(AppError::MissingDirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::MissingDirectory(path.to_path_buf()))
        }
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Whether `path` is a file with at least one byte.
pub async fn is_non_empty_file(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

/// Write bytes atomically (write to temp, then rename).
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Count regular files in a directory, ignoring placeholders.
pub async fn count_files(dir: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut count = 0;
    while let Some(entry) = entries.next_entry().await? {
        let is_placeholder = entry
            .file_name()
            .to_str()
            .is_some_and(|name| PLACEHOLDER_FILES.contains(&name));
        if !is_placeholder && entry.file_type().await?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_collapses_invalid_runs() {
        assert_eq!(sanitize_file_name("a/b\\c.png", 120), "a_b_c.png");
        assert_eq!(sanitize_file_name("a:*?b.png", 120), "a_b.png");
    }

    #[test]
    fn test_sanitize_trims_then_truncates() {
        assert_eq!(sanitize_file_name("  张三李四.png  ", 4), "张三李四");
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_file_name("头像_张三.png", 120), "头像_张三.png");
    }

    #[tokio::test]
    async fn test_require_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(require_dir(tmp.path()).await.is_ok());

        let missing = tmp.path().join("nope");
        assert!(matches!(
            require_dir(&missing).await,
            Err(AppError::MissingDirectory(_))
        ));
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("out.js");

        write_atomic(&path, b"hello").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_is_non_empty_file() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty.png");
        let full = tmp.path().join("full.png");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"x").unwrap();

        assert!(!is_non_empty_file(&empty).await);
        assert!(is_non_empty_file(&full).await);
        assert!(!is_non_empty_file(&tmp.path().join("missing.png")).await);
    }

    #[tokio::test]
    async fn test_count_files_skips_placeholders_and_dirs() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(".gitkeep"), b"").unwrap();
        std::fs::write(tmp.path().join("a.png"), b"1").unwrap();
        std::fs::write(tmp.path().join("b.png"), b"2").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();

        assert_eq!(count_files(tmp.path()).await.unwrap(), 2);
    }
}
