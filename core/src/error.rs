//! Error types for the resource-mapping engine.
//!
//! # Design
//! Callers need to tell "I called this wrong" apart from "the platform
//! rejected the call" without parsing messages. Resolution problems are
//! raised as [`RestResourceError`] before any request leaves the process;
//! non-success responses become [`HttpResponseError`] carrying status,
//! headers and the parsed body. Nothing here is retried.

use serde_json::Value;
use thiserror::Error;

use crate::http::{find_header, HttpResponse};

pub type Result<T> = std::result::Result<T, Error>;

/// Local, deterministic failures raised while mapping a call onto a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestResourceError {
    /// The call required the primary `id` and none was usable.
    #[error("no `id` given for request, cannot find path")]
    MissingPrimaryId,

    /// An identifier was present but not in the shape the path needs.
    #[error("identifier `{name}` has invalid value `{value}`")]
    InvalidIdentifier { name: String, value: String },

    /// No path descriptor could be satisfied by the supplied identifiers.
    #[error(
        "could not find a path for {method} `{operation}`; missing identifiers [{}], candidate paths [{}]",
        .missing.join(", "),
        .candidates.join(", ")
    )]
    NoMatchingPath {
        operation: String,
        method: String,
        missing: Vec<String>,
        candidates: Vec<String>,
    },

    /// A catalogue entry is internally inconsistent.
    #[error("invalid path `{path}` on {entity}: {reason}")]
    InvalidCatalogue {
        entity: String,
        path: String,
        reason: String,
    },
}

/// A completed HTTP call that returned a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("HTTP {status} {status_text}: {body}")]
pub struct HttpResponseError {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// Parsed JSON body, or the raw text as a JSON string when it was not JSON.
    pub body: Value,
}

impl HttpResponseError {
    pub(crate) fn from_response(response: &HttpResponse) -> Self {
        let body = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()))
        };
        Self {
            status: response.status,
            status_text: response.status_text(),
            headers: response.headers.clone(),
            body,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Seconds to wait as advertised by `Retry-After`, if any.
    pub fn retry_after(&self) -> Option<f64> {
        find_header(&self.headers, "retry-after")?.trim().parse().ok()
    }

    pub fn request_id(&self) -> Option<&str> {
        find_header(&self.headers, "x-request-id")
    }

    /// The platform's `errors` member, when the body carries one.
    pub fn errors(&self) -> Option<&Value> {
        self.body.get("errors")
    }
}

/// Every failure the engine can surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resource(#[from] RestResourceError),

    #[error(transparent)]
    Http(#[from] HttpResponseError),

    /// The response body was not valid JSON.
    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Query parameters could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// The transport collaborator failed before producing a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A payload did not have the shape an entity list requires.
    #[error("unexpected payload: expected {expected}, found {found}")]
    UnexpectedPayload {
        expected: &'static str,
        found: String,
    },
}

impl Error {
    /// True when the failure happened locally, before any request was sent.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resource(_))
    }

    pub fn as_http(&self) -> Option<&HttpResponseError> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}
