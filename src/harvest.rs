//! Album harvest orchestration
//!
//! Wires configuration, HTTP client, Graph client, paginator and one of the
//! two persisters together. Every run starts at the first page.

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::http::HttpClient;
use crate::output::{DownloadReport, ImageDownloader, ManifestWriter};
use crate::pagination::{PageSource, PaginationOutcome, Paginator};
use crate::types::CollectionInfo;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Result of writing a link manifest
#[derive(Debug)]
pub struct LinksSummary {
    /// Manifest file
    pub path: PathBuf,
    /// Pagination outcome, including every item written
    pub outcome: PaginationOutcome,
}

/// Result of downloading album images
#[derive(Debug)]
pub struct PhotosSummary {
    /// Album image directory
    pub dir: PathBuf,
    /// Pagination outcome
    pub outcome: PaginationOutcome,
    /// Per-image results
    pub report: DownloadReport,
}

impl PhotosSummary {
    /// Check that every page was read and every image saved
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete() && self.report.all_saved()
    }
}

/// Fetches one album and persists it
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    http: Arc<HttpClient>,
    graph: GraphClient,
}

impl Harvester {
    /// Build all components from a validated config
    ///
    /// Fails when the config is invalid or has no access token.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        config.validate_for_api()?;

        let http = Arc::new(HttpClient::with_auth(config.http(), config.auth())?);
        let graph = GraphClient::new(http.clone(), &config.api_host)?;

        Ok(Self {
            config,
            http,
            graph,
        })
    }

    /// Fetch album metadata
    pub async fn album_info(&self) -> Result<CollectionInfo> {
        self.graph.album_info(&self.config.album_id).await
    }

    /// Write every photo's id and URL to `<links_dir>/<album_id>.txt`
    pub async fn save_links(&self) -> Result<LinksSummary> {
        let album_id = &self.config.album_id;
        info!(album_id = %album_id, "Starting link harvest");

        let mut writer =
            ManifestWriter::create(&self.config.links_dir, album_id, &self.config.separator)
                .await?;
        let outcome = self.paginator().paginate_all(album_id, &mut writer).await?;

        Ok(LinksSummary {
            path: writer.path().to_path_buf(),
            outcome,
        })
    }

    /// Download every photo to `<images_dir>/<album_id>/<id>.<format>`
    pub async fn save_photos(&self) -> Result<PhotosSummary> {
        let album_id = &self.config.album_id;
        info!(album_id = %album_id, "Starting photo harvest");

        let mut downloader = ImageDownloader::new(
            self.http.clone(),
            &self.config.images_dir,
            album_id,
            &self.config.photo_format,
        );
        let outcome = self
            .paginator()
            .paginate_all(album_id, &mut downloader)
            .await?;

        Ok(PhotosSummary {
            dir: downloader.dir().to_path_buf(),
            outcome,
            report: downloader.into_report(),
        })
    }

    fn paginator(&self) -> Paginator {
        let source: Arc<dyn PageSource> = Arc::new(self.graph.clone());
        Paginator::new(source).with_config(self.config.pagination())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_new_requires_token() {
        let result = Harvester::new(HarvestConfig::new("123"));
        assert!(matches!(
            result,
            Err(Error::MissingConfigField { ref field }) if field == "access_token"
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = HarvestConfig::new("123").with_access_token("tok");
        config.page_size = 500;
        assert!(matches!(
            Harvester::new(config),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_new_builds_components() {
        let harvester =
            Harvester::new(HarvestConfig::new("123").with_access_token("tok")).unwrap();
        assert_eq!(harvester.config.album_id, "123");
        assert!(format!("{:?}", harvester.graph).contains("https://graph.facebook.com/"));
    }
}
