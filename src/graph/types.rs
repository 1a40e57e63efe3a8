//! Wire types for Graph API responses

use crate::error::Error;
use crate::types::{Item, OptionStringExt, Page};
use serde::Deserialize;
use serde_json::Value;

/// Body of `/{album}/photos`
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosResponse {
    /// Photo records, absent when the request failed
    #[serde(default)]
    pub data: Option<Vec<PhotoRecord>>,
    /// Cursor metadata
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// One raw photo record
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    /// Nested locator object, the usable URL is `largest_image.source`
    #[serde(default)]
    pub largest_image: Option<ImageSource>,
}

/// Image locator
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSource {
    pub source: String,
}

/// `paging` block of a list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

/// Error object the API puts in a response body
#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: i64,
}

impl GraphError {
    /// Pull the error object out of a response body, if there is one
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok())
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        let message = match err.kind {
            Some(kind) => format!("{kind}: {}", err.message),
            None => err.message,
        };
        Error::api(err.code, message)
    }
}

impl PhotosResponse {
    /// Convert into a page, failing when `data` is missing or a record has no
    /// image source
    pub fn into_page(self) -> Result<Page, Error> {
        let records = self
            .data
            .ok_or_else(|| Error::decode("response has no 'data' array"))?;

        let items = records
            .into_iter()
            .map(|record| match record.largest_image {
                Some(image) => Ok(Item::new(record.id, image.source)),
                None => Err(Error::decode(format!(
                    "photo {} has no largest_image.source",
                    record.id
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let next_cursor = self
            .paging
            .and_then(|p| p.cursors)
            .and_then(|c| c.after)
            .none_if_empty();

        Ok(Page::new(items, next_cursor))
    }
}
