//! Managed directory for uploaded post images.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Saves and removes uploaded files inside a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory (and parents) if needed.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `bytes` under a fresh name derived from `original_name`.
    ///
    /// Returns the stored filename, relative to the upload directory.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        self.ensure_dir().await?;

        let tag = Uuid::new_v4().simple().to_string();
        let filename = format!(
            "{}_{}_{}",
            Utc::now().timestamp_millis(),
            &tag[..8],
            sanitize_filename(original_name)
        );

        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        debug!("Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(filename)
    }

    /// Remove a stored file. Failures are logged and otherwise ignored.
    pub async fn remove(&self, filename: &str) {
        let name = sanitize_filename(filename);
        if name != filename {
            warn!("Refusing to remove suspicious upload name {:?}", filename);
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.dir.join(&name)).await {
            warn!("Failed to remove upload {}: {}", name, e);
        }
    }
}

/// Reduce a client-supplied name to a safe single path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}
