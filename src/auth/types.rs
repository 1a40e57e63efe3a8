//! Auth configuration types

use serde::{Deserialize, Serialize};

/// Where the access token travels on API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// `Authorization: Bearer <token>` header
    Header,
    /// `access_token` query parameter
    #[default]
    Query,
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Access token sent as a query parameter
    AccessToken {
        /// Query parameter name
        name: String,
        /// The token value
        value: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Graph API style `?access_token=...`
    pub fn access_token(value: impl Into<String>) -> Self {
        Self::AccessToken {
            name: "access_token".to_string(),
            value: value.into(),
        }
    }

    /// Place `token` according to `location`
    pub fn token(token: impl Into<String>, location: Location) -> Self {
        match location {
            Location::Query => Self::access_token(token),
            Location::Header => Self::Bearer {
                token: token.into(),
            },
        }
    }

    /// Check whether any credential is configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
