//! Credential context handed to every call and carried by every entity.
//!
//! How a session is obtained or stored is the caller's business; the engine
//! reads the shop host and, when present, the access token.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Header the platform reads the access token from.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Host name of the shop, e.g. `example.myshopify.com`.
    pub shop: String,
    pub access_token: Option<String>,
}

impl Session {
    /// An offline session for `shop` authenticated by `access_token`.
    pub fn new(shop: &str, access_token: &str) -> Self {
        Self {
            id: format!("offline_{shop}"),
            shop: shop.to_string(),
            access_token: Some(access_token.to_string()),
        }
    }

    pub fn credential_header(&self) -> Option<(String, String)> {
        self.access_token
            .as_ref()
            .map(|token| (ACCESS_TOKEN_HEADER.to_string(), token.clone()))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("shop", &self.shop)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
