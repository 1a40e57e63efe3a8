//! Authentication module
//!
//! Supports: access token in the query string or as a Bearer header
//!
//! The `Authenticator` attaches the configured credential to API requests.
//! Tokens are never refreshed here; a token is obtained out of band, for
//! example with [`token_from_cookie`] from a logged-in browser session.

mod authenticator;
mod cookie;
mod types;

pub use authenticator::Authenticator;
pub use cookie::{token_from_cookie, SIGNED_REQUEST_COOKIE_PREFIX};
pub use types::{AuthConfig, Location};
