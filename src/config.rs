//! Harvest configuration
//!
//! One explicit value carrying every setting a run needs. It is loaded from
//! a YAML (or JSON) file, overridden from the command line, validated, and
//! then handed to each component when it is built.

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result};
use crate::graph::{DEFAULT_API_HOST, MAX_PAGE_SIZE};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::PaginationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for one album harvest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarvestConfig {
    /// Remote album identifier
    #[serde(default)]
    pub album_id: String,

    /// Access token for the API
    #[serde(default)]
    pub access_token: Option<String>,

    /// Send the token as `?access_token=` (`query`) or a Bearer header (`header`)
    #[serde(default)]
    pub token_location: Location,

    /// API host, optionally with a version path (e.g. `https://graph.facebook.com/v19.0`)
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Photos per page (server maximum is 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Highest page to fetch, unbounded when absent
    #[serde(default)]
    pub page_limit: Option<u32>,

    /// Pause between pages in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    /// Separator between id and url in the manifest
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Directory holding `<album_id>.txt` manifests
    #[serde(default = "default_links_dir")]
    pub links_dir: PathBuf,

    /// Directory holding one `<album_id>/` folder of images per album
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Extension given to every downloaded image
    #[serde(default = "default_photo_format")]
    pub photo_format: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on requests per second, shared by page requests and image downloads
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_links_dir() -> PathBuf {
    PathBuf::from("links")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_photo_format() -> String {
    "jpg".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            album_id: String::new(),
            access_token: None,
            token_location: Location::Query,
            api_host: default_api_host(),
            page_size: default_page_size(),
            page_limit: None,
            delay_ms: 0,
            separator: default_separator(),
            links_dir: default_links_dir(),
            images_dir: default_images_dir(),
            photo_format: default_photo_format(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: None,
        }
    }
}

impl HarvestConfig {
    /// Create a config for `album_id` with default settings
    pub fn new(album_id: impl Into<String>) -> Self {
        Self {
            album_id: album_id.into(),
            ..Self::default()
        }
    }

    /// Load a config file (YAML or JSON)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_str(&content)
    }

    /// Parse a config document (YAML or JSON)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Set the access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Check every field, without requiring a token
    pub fn validate(&self) -> Result<()> {
        if self.album_id.trim().is_empty() {
            return Err(Error::missing_field("album_id"));
        }
        if self.album_id.contains(['/', '\\', '?', '#'])
            || self.album_id == "."
            || self.album_id == ".."
        {
            return Err(Error::invalid_value(
                "album_id",
                "must not contain path or query characters",
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size),
            ));
        }
        if self.page_limit == Some(0) {
            return Err(Error::invalid_value("page_limit", "must be at least 1"));
        }
        if self.separator.is_empty() {
            return Err(Error::invalid_value("separator", "must not be empty"));
        }
        if self.photo_format.is_empty() || self.photo_format.contains(['.', '/', '\\']) {
            return Err(Error::invalid_value(
                "photo_format",
                format!("'{}' is not a bare file extension", self.photo_format),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be at least 1",
            ));
        }
        url::Url::parse(&self.api_host)
            .map_err(|e| Error::invalid_value("api_host", e.to_string()))?;
        Ok(())
    }

    /// Validate, additionally requiring an access token
    pub fn validate_for_api(&self) -> Result<()> {
        self.validate()?;
        match self.access_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(Error::missing_field("access_token")),
        }
    }

    /// Pagination settings
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig::new()
            .with_page_size(self.page_size)
            .with_page_limit(self.page_limit)
            .with_delay(Duration::from_millis(self.delay_ms))
    }

    /// HTTP client settings
    pub fn http(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));
        match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder.no_rate_limit(),
        }
        .build()
    }

    /// API credentials
    pub fn auth(&self) -> AuthConfig {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => AuthConfig::token(token, self.token_location),
            _ => AuthConfig::None,
        }
    }
}
