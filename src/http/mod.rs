//! HTTP client module
//!
//! Provides the HTTP client used for Graph API calls and image downloads.
//!
//! # Features
//!
//! - **JSON Requests**: Authenticated GET with JSON decoding
//! - **Streaming Downloads**: Response bodies written to disk chunk by chunk
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Transport Seam**: `JsonTransport` trait so callers can be driven without a network

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, JsonTransport};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
