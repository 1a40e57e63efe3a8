//! Output module
//!
//! Per-page persisters plugged into the paginator as `PageSink`s.
//!
//! # Overview
//!
//! This module provides:
//! - `ManifestWriter` - appends `id<SEP>url` lines to `<links_dir>/<album>.txt`
//! - `ImageDownloader` - downloads each page's images concurrently into
//!   `<images_dir>/<album>/<id>.<ext>`, isolating per-item failures

mod download;
mod manifest;

pub use download::{DownloadOutcome, DownloadReport, FailedDownload, ImageDownloader, SavedImage};
pub use manifest::ManifestWriter;

#[cfg(test)]
mod tests;
