// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # album-harvest
//!
//! Walks a cursor-paginated photo album on the Graph API page by page and
//! persists every photo, either as a line in a link manifest or as an image
//! file downloaded concurrently with the rest of its page.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use album_harvest::{harvest::Harvester, HarvestConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HarvestConfig::new("1234567890").with_access_token("EAAB...");
//!     let harvester = Harvester::new(config)?;
//!
//!     let info = harvester.album_info().await?;
//!     println!("{:?} has {:?} photos", info.name, info.count);
//!
//!     let summary = harvester.save_links().await?;
//!     println!("{} links in {}", summary.outcome.len(), summary.path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Harvester (config → run)                    │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────┬───────┴──────┬───────────────────────────┐
//! │   Auth   │   HTTP   │    Graph     │  Paginator → PageSink     │
//! ├──────────┼──────────┼──────────────┼───────────────────────────┤
//! │ Token    │ GET/JSON │ photos page  │ ManifestWriter            │
//! │ Cookie   │ Stream   │ album info   │ ImageDownloader           │
//! │          │ RateLimit│ error object │                           │
//! └──────────┴──────────┴──────────────┴───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Graph API album endpoints
pub mod graph;

/// Cursor pagination loop
pub mod pagination;

/// Manifest and image persisters
pub mod output;

/// Harvest configuration
pub mod config;

/// Run orchestration
pub mod harvest;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use config::HarvestConfig;
pub use harvest::{Harvester, LinksSummary, PhotosSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
