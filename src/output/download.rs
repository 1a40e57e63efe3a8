//! Concurrent image downloader
//!
//! Every item of a page is downloaded at the same time; the page completes
//! when all of them have settled. A failed item is logged and recorded, and
//! never affects its siblings or the pagination run.

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::PageSink;
use crate::types::Item;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one item's download attempt
#[derive(Debug)]
pub struct DownloadOutcome {
    /// Item identifier
    pub id: String,
    /// Source URL
    pub url: String,
    /// Target file
    pub path: PathBuf,
    /// Bytes written, or why the attempt failed
    pub result: Result<u64>,
}

impl DownloadOutcome {
    /// Check if the file was saved
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A saved image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub id: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// An image that could not be saved
#[derive(Debug)]
pub struct FailedDownload {
    pub id: String,
    pub url: String,
    pub error: Error,
}

/// Per-item results accumulated over a whole run
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Images written to disk
    pub saved: Vec<SavedImage>,
    /// Images that failed, with the reason
    pub failed: Vec<FailedDownload>,
}

impl DownloadReport {
    /// Fold one page's outcomes into the report
    pub fn record(&mut self, outcomes: Vec<DownloadOutcome>) {
        for outcome in outcomes {
            match outcome.result {
                Ok(bytes) => self.saved.push(SavedImage {
                    id: outcome.id,
                    path: outcome.path,
                    bytes,
                }),
                Err(error) => self.failed.push(FailedDownload {
                    id: outcome.id,
                    url: outcome.url,
                    error,
                }),
            }
        }
    }

    /// Total attempts
    pub fn attempted(&self) -> usize {
        self.saved.len() + self.failed.len()
    }

    /// Total bytes written
    pub fn bytes(&self) -> u64 {
        self.saved.iter().map(|s| s.bytes).sum()
    }

    /// Check if every attempt succeeded
    pub fn all_saved(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads album images into `<images_dir>/<album_id>/<id>.<format>`
pub struct ImageDownloader {
    client: Arc<HttpClient>,
    dir: PathBuf,
    format: String,
    report: DownloadReport,
}

impl ImageDownloader {
    /// Create a downloader for one album
    ///
    /// Nothing touches the filesystem until the first page arrives.
    pub fn new(
        client: Arc<HttpClient>,
        images_dir: impl AsRef<Path>,
        album_id: &str,
        format: impl Into<String>,
    ) -> Self {
        Self {
            client,
            dir: images_dir.as_ref().join(album_id),
            format: format.into(),
            report: DownloadReport::default(),
        }
    }

    /// Directory images are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for an item
    ///
    /// Ids that could escape the album directory are rejected.
    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(Error::output(format!("unsafe item id for a file name: '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.{}", self.format)))
    }

    /// Consume the downloader, returning its report
    pub fn into_report(self) -> DownloadReport {
        self.report
    }

    /// Download every item of a page concurrently
    ///
    /// Returns once all attempts have settled, one outcome per item in input
    /// order. Only a failure to create the album directory is an `Err`.
    pub async fn download_page(&self, items: &[Item]) -> Result<Vec<DownloadOutcome>> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        let attempts = items.iter().map(|item| self.download_item(item));
        Ok(join_all(attempts).await)
    }

    async fn download_item(&self, item: &Item) -> DownloadOutcome {
        let (path, result) = match self.path_for(&item.id) {
            Ok(path) => {
                let result = self.client.download_to_file(&item.url, &path).await;
                (path, result)
            }
            Err(e) => (self.dir.clone(), Err(e)),
        };

        match &result {
            Ok(bytes) => info!(id = %item.id, path = %path.display(), bytes, "Saved image"),
            Err(e) => warn!(id = %item.id, error = %e, "Failed to save image"),
        }

        DownloadOutcome {
            id: item.id.clone(),
            url: item.url.clone(),
            path,
            result,
        }
    }
}

#[async_trait]
impl PageSink for ImageDownloader {
    async fn on_page(&mut self, page: u32, items: &[Item]) -> Result<()> {
        info!(page, count = items.len(), dir = %self.dir.display(), "Saving images");

        let outcomes = self.download_page(items).await?;
        let saved = outcomes.iter().filter(|o| o.is_ok()).count();

        info!(page, saved, failed = outcomes.len() - saved, "Saved page images");
        self.report.record(outcomes);
        Ok(())
    }
}

impl std::fmt::Debug for ImageDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDownloader")
            .field("dir", &self.dir)
            .field("format", &self.format)
            .field("saved", &self.report.saved.len())
            .field("failed", &self.report.failed.len())
            .finish_non_exhaustive()
    }
}
