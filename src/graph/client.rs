//! Graph API client
//!
//! Builds album endpoint URLs and maps responses into crate types.

use super::types::{GraphError, PhotosResponse};
use crate::error::{Error, Result};
use crate::http::JsonTransport;
use crate::pagination::PageSource;
use crate::types::{CollectionInfo, Page};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Default Graph API host
pub const DEFAULT_API_HOST: &str = "https://graph.facebook.com";

/// Largest page the server will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Field holding the nested image locator of a photo
const PHOTO_FIELDS: &str = "largest_image";

/// Metadata fields requested for an album
const ALBUM_FIELDS: &str = "count,link,name";

/// Client for the album endpoints
#[derive(Clone)]
pub struct GraphClient {
    transport: Arc<dyn JsonTransport>,
    api_host: Url,
}

impl GraphClient {
    /// Create a client that sends requests through `transport`
    ///
    /// Credentials are the transport's concern; URLs built here never carry
    /// the access token.
    pub fn new(transport: Arc<dyn JsonTransport>, api_host: &str) -> Result<Self> {
        let api_host = Url::parse(api_host)?;
        if api_host.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "api_host",
                format!("'{api_host}' cannot be used as a base URL"),
            ));
        }
        Ok(Self {
            transport,
            api_host,
        })
    }

    /// URL of one page of album photos
    ///
    /// The `after` parameter is only present when a cursor is given.
    pub fn photos_url(&self, album_id: &str, cursor: Option<&str>, limit: u32) -> Result<Url> {
        let mut url = self.endpoint(&[album_id, "photos"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("fields", PHOTO_FIELDS)
                .append_pair("limit", &limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("after", cursor);
            }
        }
        Ok(url)
    }

    /// URL of the album metadata
    pub fn album_url(&self, album_id: &str) -> Result<Url> {
        let mut url = self.endpoint(&[album_id])?;
        url.query_pairs_mut().append_pair("fields", ALBUM_FIELDS);
        Ok(url)
    }

    /// Fetch one page of album photos
    ///
    /// `limit` must be within `1..=MAX_PAGE_SIZE`. Any transport error, API
    /// error object, or malformed body is returned as `Err`; an empty page is
    /// a successful result.
    pub async fn fetch_page(
        &self,
        album_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page> {
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}, got {limit}"),
            ));
        }

        let url = self.photos_url(album_id, cursor, limit)?;
        let body = self.get(&url).await?;
        let response: PhotosResponse = serde_json::from_value(body)
            .map_err(|e| Error::decode(format!("unexpected photos response: {e}")))?;
        response.into_page()
    }

    /// Fetch descriptive metadata of an album
    pub async fn album_info(&self, album_id: &str) -> Result<CollectionInfo> {
        let url = self.album_url(album_id)?;
        let body = self.get(&url).await?;

        Ok(CollectionInfo {
            id: album_id.to_string(),
            count: body.get("count").and_then(Value::as_u64),
            link: body.get("link").and_then(Value::as_str).map(String::from),
            name: body.get("name").and_then(Value::as_str).map(String::from),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_host.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("cannot extend API host '{}'", self.api_host)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON body, surfacing API error objects as `Error::Api`
    async fn get(&self, url: &Url) -> Result<Value> {
        debug!(path = url.path(), query = url.query().unwrap_or(""), "Graph request");

        match self.transport.get_json_value(url).await {
            Ok(body) => match GraphError::from_body(&body) {
                Some(err) => Err(err.into()),
                None => Ok(body),
            },
            Err(Error::HttpStatus { status, body }) => {
                let api_error = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| GraphError::from_body(&v));
                Err(api_error.map_or(Error::HttpStatus { status, body }, Error::from))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PageSource for GraphClient {
    async fn fetch_page(&self, album_id: &str, cursor: Option<&str>, limit: u32) -> Result<Page> {
        GraphClient::fetch_page(self, album_id, cursor, limit).await
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("api_host", &self.api_host.as_str())
            .finish_non_exhaustive()
    }
}
