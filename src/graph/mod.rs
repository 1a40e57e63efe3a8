//! Graph API module
//!
//! Typed access to the two album endpoints the harvester needs:
//!
//! - `/{album}/photos` one page at a time, cursor driven
//! - `/{album}` for descriptive metadata
//!
//! # Overview
//!
//! `GraphClient` builds request URLs, sends them through a `JsonTransport`
//! and maps the raw JSON into `Page` and `CollectionInfo`. Error objects in a
//! response body surface as `Error::Api`.

mod client;
mod types;

pub use client::{GraphClient, DEFAULT_API_HOST, MAX_PAGE_SIZE};
pub use types::{GraphError, ImageSource, Paging, PhotoRecord, PhotosResponse};
