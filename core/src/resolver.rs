//! Choosing the path descriptor for a call.
//!
//! A candidate shares the requested method and operation and has every one
//! of its identifiers supplied. Among candidates the one needing the most
//! identifiers wins; equal counts keep catalogue order.

use serde_json::Value;
use tracing::trace;

use crate::catalogue::{EntityDescriptor, PathDescriptor};
use crate::error::RestResourceError;
use crate::http::HttpMethod;
use crate::request::Ids;

/// Fail unless a usable primary `id` was supplied.
///
/// Numbers and strings of ASCII digits are accepted; anything else present
/// under `id` is reported as invalid.
pub fn require_primary_id(ids: &Ids) -> Result<(), RestResourceError> {
    match ids.get("id") {
        None | Some(Value::Null) => Err(RestResourceError::MissingPrimaryId),
        Some(Value::String(text)) if text.is_empty() => Err(RestResourceError::MissingPrimaryId),
        Some(Value::Number(_)) => Ok(()),
        Some(Value::String(text)) if text.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        Some(other) => Err(RestResourceError::InvalidIdentifier {
            name: "id".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Select the most specific path for `operation` that `ids` can satisfy.
pub fn resolve<'a>(
    entity: &'a EntityDescriptor,
    http_method: HttpMethod,
    operation: &str,
    ids: &Ids,
    require_ids: bool,
) -> Result<&'a PathDescriptor, RestResourceError> {
    if require_ids {
        require_primary_id(ids)?;
    }

    let mut best: Option<&PathDescriptor> = None;
    let mut candidates = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    for path in entity
        .paths
        .iter()
        .filter(|path| path.http_method == http_method && path.operation == operation)
    {
        candidates.push(path.path.to_string());
        let absent: Vec<&str> = path.ids.iter().copied().filter(|id| !ids.is_present(id)).collect();
        if !absent.is_empty() {
            for id in absent {
                if !missing.iter().any(|name| name == id) {
                    missing.push(id.to_string());
                }
            }
            continue;
        }
        if best.is_none_or(|current| path.ids.len() > current.ids.len()) {
            best = Some(path);
        }
    }

    match best {
        Some(path) => {
            trace!(
                entity = entity.name,
                operation,
                template = path.path,
                specificity = path.ids.len(),
                "resolved path"
            );
            Ok(path)
        }
        None => Err(RestResourceError::NoMatchingPath {
            operation: operation.to_string(),
            method: http_method.to_string(),
            missing,
            candidates,
        }),
    }
}
