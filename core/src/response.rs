//! Reading response bodies.
//!
//! # Design
//! Bodies are parsed into `serde_json::Value` with arbitrary-precision
//! numbers, so an integer beyond 2^53 keeps its exact digits everywhere in
//! the tree, not only under fields the hydrator later normalizes.
//!
//! The payload is then looked up under the resource's names. Names are
//! tried in declaration order and, within a pair, singular before plural;
//! the first key present wins. A body matching none of them is handed back
//! whole for the caller to interpret.

use serde_json::{Map, Value};
use tracing::warn;

use crate::catalogue::ResourceNames;
use crate::error::{HttpResponseError, Result};
use crate::http::HttpResponse;

/// A body with the resource payload located.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody {
    pub payload: Value,
    pub is_list: bool,
    /// The key the payload was found under, `None` for a raw body.
    pub key: Option<String>,
}

/// Parse raw text, treating an empty body as an empty object.
pub fn parse_json(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(raw)?)
}

/// Parse `raw` and locate the payload for a resource named by `names`.
pub fn parse(raw: &str, names: &[ResourceNames]) -> Result<ParsedBody> {
    Ok(locate(parse_json(raw)?, names))
}

/// Locate the payload inside an already-parsed body.
pub fn locate(body: Value, names: &[ResourceNames]) -> ParsedBody {
    let Value::Object(mut map) = body else {
        let is_list = body.is_array();
        return ParsedBody { payload: body, is_list, key: None };
    };

    for pair in names {
        if let Some(payload) = map.remove(pair.singular) {
            return ParsedBody {
                payload,
                is_list: false,
                key: Some(pair.singular.to_string()),
            };
        }
        if let Some(payload) = map.remove(pair.plural) {
            return ParsedBody {
                payload,
                is_list: true,
                key: Some(pair.plural.to_string()),
            };
        }
    }

    ParsedBody {
        payload: Value::Object(map),
        is_list: false,
        key: None,
    }
}

/// Surface non-success statuses as [`HttpResponseError`].
pub fn check_status(response: &HttpResponse) -> std::result::Result<(), HttpResponseError> {
    if response.is_success() {
        return Ok(());
    }
    let err = HttpResponseError::from_response(response);
    warn!(status = err.status, request_id = err.request_id(), "request failed");
    Err(err)
}
