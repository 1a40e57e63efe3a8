//! Link manifest writer
//!
//! Plain UTF-8 text, one `<id><SEP><url>` line per item, in server order.
//! No header, no sorting, no deduplication.

use crate::error::{Error, Result};
use crate::pagination::PageSink;
use crate::types::Item;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Appends one block of lines per page to an album manifest
pub struct ManifestWriter {
    path: PathBuf,
    separator: String,
    file: File,
    lines_written: usize,
}

impl ManifestWriter {
    /// Location of the manifest for `album_id` under `links_dir`
    pub fn manifest_path(links_dir: impl AsRef<Path>, album_id: &str) -> PathBuf {
        links_dir.as_ref().join(format!("{album_id}.txt"))
    }

    /// Create (or truncate) the manifest for `album_id`
    ///
    /// `links_dir` is created if missing. Any manifest left by an earlier run
    /// is emptied here, once, before the first page arrives.
    pub async fn create(
        links_dir: impl AsRef<Path>,
        album_id: &str,
        separator: impl Into<String>,
    ) -> Result<Self> {
        let links_dir = links_dir.as_ref();
        fs::create_dir_all(links_dir).await.map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", links_dir.display()))
        })?;

        let path = Self::manifest_path(links_dir, album_id);
        File::create(&path)
            .await
            .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::output(format!("Failed to open {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Manifest truncated");

        Ok(Self {
            path,
            separator: separator.into(),
            file,
            lines_written: 0,
        })
    }

    /// Path of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Render a page as a block of newline-terminated lines
    pub fn render(items: &[Item], separator: &str) -> String {
        items
            .iter()
            .map(|item| item.manifest_line(separator) + "\n")
            .collect()
    }

    /// Append one page worth of lines
    pub async fn append(&mut self, items: &[Item]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let block = Self::render(items, &self.separator);
        self.file
            .write_all(block.as_bytes())
            .await
            .map_err(|e| Error::output(format!("Failed to write {}: {e}", self.path.display())))?;
        self.file
            .flush()
            .await
            .map_err(|e| Error::output(format!("Failed to flush {}: {e}", self.path.display())))?;

        self.lines_written += items.len();
        Ok(())
    }
}

#[async_trait]
impl PageSink for ManifestWriter {
    async fn on_page(&mut self, page: u32, items: &[Item]) -> Result<()> {
        self.append(items).await?;
        info!(
            page,
            lines = items.len(),
            total = self.lines_written,
            path = %self.path.display(),
            "Saved links"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ManifestWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestWriter")
            .field("path", &self.path)
            .field("separator", &self.separator)
            .field("lines_written", &self.lines_written)
            .finish_non_exhaustive()
    }
}
