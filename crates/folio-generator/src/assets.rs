//! Static asset copying.
//!
//! Files under the static directory (logos, favicon, fonts) are copied
//! verbatim into the output, keeping their relative paths.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid asset path.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// What a copy pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStats {
    /// Files copied.
    pub files: usize,

    /// Bytes copied.
    pub bytes: u64,
}

/// Copies static files into the output directory.
#[derive(Debug, Default)]
pub struct AssetProcessor;

impl AssetProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Copy every non-hidden file from `source_dir` into `dest_dir`.
    pub fn process(&self, source_dir: &Path, dest_dir: &Path) -> Result<AssetStats> {
        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "copying static assets"
        );

        let mut stats = AssetStats::default();

        if !source_dir.exists() {
            debug!("static directory does not exist, skipping");
            return Ok(stats);
        }

        self.process_dir(source_dir, source_dir, dest_dir, &mut stats)?;

        info!(files = stats.files, bytes = stats.bytes, "assets copied");
        Ok(stats)
    }

    fn process_dir(
        &self,
        base_dir: &Path,
        current_dir: &Path,
        dest_base: &Path,
        stats: &mut AssetStats,
    ) -> Result<()> {
        for entry in fs::read_dir(current_dir)? {
            let entry = entry?;
            let path = entry.path();

            // Skip hidden files/directories
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if path.is_dir() {
                self.process_dir(base_dir, &path, dest_base, stats)?;
            } else if path.is_file() {
                let relative = path
                    .strip_prefix(base_dir)
                    .map_err(|_| AssetError::InvalidPath(path.clone()))?;
                let dest_path = dest_base.join(relative);

                if let Some(parent) = dest_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                stats.bytes += fs::copy(&path, &dest_path)?;
                stats.files += 1;
                debug!(asset = %relative.display(), "copied");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_tree_verbatim() {
        let src = tempfile::tempdir().expect("tempdir");
        let dest = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(src.path().join("fonts")).expect("mkdir");
        fs::write(src.path().join("logo.svg"), "<svg/>").expect("write");
        fs::write(src.path().join("fonts/inter.woff2"), [0u8, 1, 2]).expect("write");
        fs::write(src.path().join(".DS_Store"), "x").expect("write");

        let stats = AssetProcessor::new()
            .process(src.path(), dest.path())
            .expect("process");

        assert_eq!(stats.files, 2);
        assert_eq!(stats.bytes, 9);
        assert_eq!(
            fs::read_to_string(dest.path().join("logo.svg")).expect("read"),
            "<svg/>"
        );
        assert!(dest.path().join("fonts/inter.woff2").exists());
        assert!(!dest.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_missing_source_is_noop() {
        let dest = tempfile::tempdir().expect("tempdir");
        let stats = AssetProcessor::new()
            .process(Path::new("/nonexistent/static"), dest.path())
            .expect("process");
        assert_eq!(stats, AssetStats::default());
    }
}
