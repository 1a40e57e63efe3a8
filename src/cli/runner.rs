//! CLI runner - executes commands

use crate::auth::token_from_cookie;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::HarvestConfig;
use crate::error::{Error, Result};
use crate::harvest::Harvester;
use crate::pagination::PaginationOutcome;
use serde_json::{json, Value};
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Info => self.info().await,
            Commands::Links => self.links().await,
            Commands::Download => self.download().await,
            Commands::Token { cookie } => self.token(cookie),
        }
    }

    /// Load the config file, if any, and apply command-line overrides
    pub fn harvest_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => HarvestConfig::load(path)?,
            None => HarvestConfig::default(),
        };

        let o = &self.cli.overrides;
        if let Some(album) = &o.album {
            config.album_id.clone_from(album);
        }
        if let Some(token) = &o.token {
            config.access_token = Some(token.clone());
        }
        if let Some(page_size) = o.page_size {
            config.page_size = page_size;
        }
        if o.page_limit.is_some() {
            config.page_limit = o.page_limit;
        }
        if let Some(delay_ms) = o.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(separator) = &o.separator {
            config.separator.clone_from(separator);
        }
        if let Some(dir) = &o.links_dir {
            config.links_dir.clone_from(dir);
        }
        if let Some(dir) = &o.images_dir {
            config.images_dir.clone_from(dir);
        }
        if let Some(format) = &o.format {
            config.photo_format.clone_from(format);
        }

        Ok(config)
    }

    fn harvester(&self) -> Result<Harvester> {
        Harvester::new(self.harvest_config()?)
    }

    /// Print album metadata
    async fn info(&self) -> Result<()> {
        let info = self.harvester()?.album_info().await?;
        self.output_message(&json!({
            "type": "ALBUM",
            "album": info,
        }));
        Ok(())
    }

    /// Write the link manifest
    async fn links(&self) -> Result<()> {
        let summary = self.harvester()?.save_links().await?;

        self.output_message(&json!({
            "type": "LINKS",
            "links": {
                "path": summary.path.display().to_string(),
                "items": summary.outcome.len(),
                "pages": summary.outcome.pages_fetched,
                "stop": summary.outcome.stop.to_string(),
                "duration_ms": summary.outcome.duration_ms,
            }
        }));

        Self::ensure_read(&summary.outcome)
    }

    /// Download every image
    async fn download(&self) -> Result<()> {
        let summary = self.harvester()?.save_photos().await?;
        let report = &summary.report;

        let failed: Vec<Value> = report
            .failed
            .iter()
            .map(|f| json!({ "id": f.id, "url": f.url, "error": f.error.to_string() }))
            .collect();

        self.output_message(&json!({
            "type": "DOWNLOAD",
            "download": {
                "dir": summary.dir.display().to_string(),
                "items": summary.outcome.len(),
                "pages": summary.outcome.pages_fetched,
                "saved": report.saved.len(),
                "bytes": report.bytes(),
                "failed": failed,
                "stop": summary.outcome.stop.to_string(),
                "duration_ms": summary.outcome.duration_ms,
            }
        }));

        if !report.all_saved() {
            return Err(Error::Other(format!(
                "{} of {} downloads failed",
                report.failed.len(),
                report.attempted()
            )));
        }
        Self::ensure_read(&summary.outcome)
    }

    /// Print the token held in a session cookie
    fn token(&self, cookie: &str) -> Result<()> {
        let token = token_from_cookie(cookie)?;
        println!("{token}");
        Ok(())
    }

    /// Fail when pagination stopped on a fetch error
    fn ensure_read(outcome: &PaginationOutcome) -> Result<()> {
        match outcome.stop.failure() {
            Some(e) => {
                warn!(pages = outcome.pages_fetched, "Album was only partially read");
                Err(Error::Other(format!(
                    "stopped after {} page(s): {e}",
                    outcome.pages_fetched
                )))
            }
            None => Ok(()),
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_overrides_without_config_file() {
        let runner = runner(&[
            "album-harvest",
            "links",
            "--album",
            "42",
            "--token",
            "tok",
            "--page-size",
            "25",
            "--page-limit",
            "3",
            "--separator",
            ";",
            "--links-dir",
            "/tmp/links",
        ]);

        let config = runner.harvest_config().unwrap();
        assert_eq!(config.album_id, "42");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.page_limit, Some(3));
        assert_eq!(config.separator, ";");
        assert_eq!(config.links_dir, PathBuf::from("/tmp/links"));
        assert_eq!(config.images_dir, PathBuf::from("images"));
    }

    #[test]
    fn test_overrides_take_precedence_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.yaml");
        std::fs::write(&path, "album_id: '1'\ndelay_ms: 500\nphoto_format: png\n").unwrap();

        let runner = runner(&[
            "album-harvest",
            "-C",
            path.to_str().unwrap(),
            "download",
            "--album",
            "2",
            "--format",
            "webp",
        ]);

        let config = runner.harvest_config().unwrap();
        assert_eq!(config.album_id, "2");
        assert_eq!(config.delay_ms, 500);
        assert_eq!(config.photo_format, "webp");
    }

    #[test]
    fn test_missing_config_file() {
        let runner = runner(&["album-harvest", "-C", "/no/such/harvest.yaml", "info"]);
        assert!(matches!(
            runner.harvest_config(),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_token_command_parses() {
        let cli = Cli::try_parse_from(["album-harvest", "token", "--cookie", "fbsr_1=a.b"]).unwrap();
        assert!(matches!(cli.command, Commands::Token { ref cookie } if cookie == "fbsr_1=a.b"));
    }

    #[tokio::test]
    async fn test_links_without_album_fails_before_requests() {
        let runner = runner(&["album-harvest", "links", "--token", "tok"]);
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "album_id"));
    }
}
