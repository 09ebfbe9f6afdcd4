//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The engine builds `HttpRequest`
//! values and interprets `HttpResponse` values; executing the round-trip is
//! the job of a [`Transport`](crate::client::Transport) supplied by the
//! caller. Query parameters are carried separately from the URL so the
//! transport can encode or log them as it sees fit; [`HttpRequest::url`]
//! renders the final address.

use std::fmt;

use crate::error::{Error, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL without a query string. `query` holds the
/// already-stringified parameters in the order they will be emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Full URL including the encoded query string.
    pub fn url(&self) -> Result<String> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let encoded = serde_urlencoded::to_string(&self.query).map_err(|err| Error::Encode(err.to_string()))?;
        Ok(format!("{}?{encoded}", self.path))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup returning the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// All values of a repeated header, in arrival order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Canonical reason phrase for the status code, empty when unknown.
    pub fn status_text(&self) -> String {
        ::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string()
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: Vec<(&str, &str)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "https://shop.example/admin/api/2024-01/products.json".to_string(),
            query: query
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: vec![("X-Shopify-Access-Token".to_string(), "secret".to_string())],
            body: None,
        }
    }

    #[test]
    fn url_without_query_is_path() {
        let req = request(Vec::new());
        assert_eq!(req.url().unwrap(), "https://shop.example/admin/api/2024-01/products.json");
    }

    #[test]
    fn url_encodes_query_in_order() {
        let req = request(vec![("limit", "2"), ("fields", "id,title")]);
        assert_eq!(
            req.url().unwrap(),
            "https://shop.example/admin/api/2024-01/products.json?limit=2&fields=id%2Ctitle"
        );
    }

    #[test]
    fn url_keeps_cursor_and_repeated_keys() {
        let req = request(vec![("page_info", "abc=="), ("ids[]", "1"), ("ids[]", "2")]);
        assert_eq!(
            req.url().unwrap(),
            "https://shop.example/admin/api/2024-01/products.json?page_info=abc%3D%3D&ids%5B%5D=1&ids%5B%5D=2"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(Vec::new());
        assert_eq!(req.header("x-shopify-access-token"), Some("secret"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn response_status_text_and_success() {
        let response = HttpResponse {
            status: 429,
            headers: vec![
                ("Link".to_string(), "<a>; rel=\"next\"".to_string()),
                ("link".to_string(), "<b>; rel=\"previous\"".to_string()),
            ],
            body: String::new(),
        };
        assert!(!response.is_success());
        assert_eq!(response.status_text(), "Too Many Requests");
        assert_eq!(response.header_values("LINK").count(), 2);
    }
}
