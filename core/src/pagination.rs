//! Cursor pagination from `Link` response headers.
//!
//! Only the directions the server advertises are exposed. There is no
//! notion of a last page or a page count.

use serde::{Deserialize, Serialize};

use crate::http::HttpResponse;
use crate::request::Params;

/// One direction of travel: where to go and with which query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Path relative to the versioned API root, e.g. `products.json`.
    pub path: String,
    /// Query pairs exactly as they appeared in the link, repeats included.
    pub query: Vec<(String, String)>,
}

impl PageQuery {
    /// The query as parameters ready for the next call.
    pub fn params(&self) -> Params {
        Params::from_query(&self.query)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// `limit` the request was made with, if any.
    pub limit: Option<String>,
    /// `fields` restriction carried by the links, if any.
    pub fields: Option<Vec<String>>,
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
    pub next_page: Option<PageQuery>,
    pub prev_page: Option<PageQuery>,
}

impl PageInfo {
    pub fn is_empty(&self) -> bool {
        self.next_page.is_none() && self.prev_page.is_none()
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.prev_page.is_some()
    }
}

/// Build [`PageInfo`] from every `Link` header on `response`.
///
/// `request_query` is the query the response answers; it supplies `limit`.
pub fn extract(response: &HttpResponse, request_query: &[(String, String)]) -> PageInfo {
    extract_from_headers(&response.headers, request_query)
}

pub fn extract_from_headers(headers: &[(String, String)], request_query: &[(String, String)]) -> PageInfo {
    let mut info = PageInfo::default();
    let links = headers.iter().filter(|(name, _)| name.eq_ignore_ascii_case("link"));
    for (_, value) in links {
        for entry in split_entries(value) {
            let Some((url, rel)) = parse_entry(entry) else {
                continue;
            };
            let page = page_query(url);
            if info.fields.is_none() {
                info.fields = page
                    .query
                    .iter()
                    .find(|(key, _)| key == "fields")
                    .map(|(_, fields)| fields.split(',').map(str::to_string).collect());
            }
            match rel {
                "next" => {
                    info.next_page_url = Some(url.to_string());
                    info.next_page = Some(page);
                }
                "previous" | "prev" => {
                    info.previous_page_url = Some(url.to_string());
                    info.prev_page = Some(page);
                }
                _ => {}
            }
        }
    }
    if !info.is_empty() {
        info.limit = request_query
            .iter()
            .find(|(key, _)| key == "limit")
            .map(|(_, limit)| limit.clone());
    }
    info
}

/// Split on the commas that separate entries, not those inside `<...>`.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (index, ch) in header.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(header[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(header[start..].trim());
    entries.retain(|entry| !entry.is_empty());
    entries
}

/// `<url>; rel="next"` into `(url, "next")`.
fn parse_entry(entry: &str) -> Option<(&str, &str)> {
    let rest = entry.strip_prefix('<')?;
    let (url, params) = rest.split_once('>')?;
    let rel = params.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("rel")
            .then(|| value.trim().trim_matches('"'))
    })?;
    Some((url, rel))
}

fn page_query(url: &str) -> PageQuery {
    let (location, query) = url.split_once('?').unwrap_or((url, ""));
    let query = serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default();
    PageQuery {
        path: api_relative_path(location),
        query,
    }
}

/// Strip scheme, host and the `/<prefix>/api/<version>/` segment.
fn api_relative_path(location: &str) -> String {
    let without_scheme = location.split_once("://").map_or(location, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("", |index| &without_scheme[index + 1..]);
    let segments: Vec<&str> = path.split('/').collect();
    match segments.iter().position(|segment| *segment == "api") {
        Some(index) if index + 2 <= segments.len() => segments[index + 2..].join("/"),
        _ => path.to_string(),
    }
}
