//! In-memory video asset produced by a completed generation.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::client::VeoError;

/// MIME type of generated videos.
pub const VIDEO_MIME: &str = "video/mp4";

/// The downloaded video, held in memory until the caller saves or drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    bytes: Vec<u8>,
}

impl VideoAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw video bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime(&self) -> &'static str {
        VIDEO_MIME
    }

    /// Write the video to disk, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::IoError` if directory creation or the write fails.
    pub async fn save(&self, dest: &Path) -> Result<PathBuf, VeoError> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::File::create(dest).await?;
        file.write_all(&self.bytes).await?;
        file.flush().await?;

        Ok(dest.to_path_buf())
    }
}
