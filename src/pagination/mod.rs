//! Pagination module
//!
//! Drives a cursor-paginated album from the first page to exhaustion.
//!
//! # Overview
//!
//! `Paginator` asks a `PageSource` for one page at a time, hands every page
//! to a `PageSink` and waits for it before requesting the next. Session state
//! lives in a `PaginationState` created per run; nothing survives the call,
//! so an interrupted run starts again at page 1.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{
    PageSink, PageSource, PaginationConfig, PaginationOutcome, PaginationState, StopReason,
};
