//! Media intake: sanitized, timestamped storage of uploaded files
//!
//! Each upload kind gets its own directory under the media root. Stored
//! filenames (never absolute paths) are what the database references.

use std::path::{Path, PathBuf};

use chrono::Utc;
use farmlink_common::Result;

/// Storage category for an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Profile,
    ProductImage,
    Video,
    Thumbnail,
}

impl MediaKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Profile => "profiles",
            MediaKind::ProductImage => "products",
            MediaKind::Video => "videos",
            MediaKind::Thumbnail => "thumbnails",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the per-kind directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        for kind in [
            MediaKind::Profile,
            MediaKind::ProductImage,
            MediaKind::Video,
            MediaKind::Thumbnail,
        ] {
            std::fs::create_dir_all(self.root.join(kind.dir_name()))?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under the kind's directory and return the stored
    /// filename. Names are sanitized and timestamp-prefixed so repeated
    /// uploads of the same name cannot collide.
    pub fn save(&self, kind: MediaKind, original_name: &str, bytes: &[u8]) -> Result<String> {
        let stored = format!(
            "{}_{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            sanitize_filename(original_name)
        );
        let path = self.root.join(kind.dir_name()).join(&stored);
        std::fs::write(&path, bytes)?;
        tracing::debug!(kind = kind.dir_name(), file = %stored, "Stored uploaded file");
        Ok(stored)
    }

    pub fn path_for(&self, kind: MediaKind, filename: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(filename)
    }

    /// Best-effort removal; failures are logged and swallowed
    pub fn remove(&self, kind: MediaKind, filename: &str) {
        let path = self.path_for(kind, filename);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove media file");
            }
        }
    }
}

/// Reduce an uploaded filename to a safe basename: path components dropped,
/// anything outside ASCII alphanumerics, '.', '-', '_' replaced, leading
/// dots stripped.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
