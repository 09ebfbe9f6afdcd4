//! Turning a resolved path into a transport-agnostic `HttpRequest`.
//!
//! # Design
//! `RequestBuilder` is stateless apart from its configuration. It substitutes
//! identifiers into the template, flattens caller parameters into a query
//! string and wraps write bodies under the entity's singular key. The caller
//! (or [`RestClient`](crate::client::RestClient)) executes the result.

use serde_json::{Map, Value};
use tracing::debug;

use crate::catalogue::{EntityDescriptor, PathDescriptor};
use crate::config::ClientConfig;
use crate::entity::Entity;
use crate::error::{Error, RestResourceError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::serialize::serialize;
use crate::session::Session;

/// Identifier values supplied for a call, in caller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ids(Vec<(String, Value)>);

impl Ids {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Ids::new().with("id", id)`.
    pub fn id(id: impl Into<Value>) -> Self {
        Self::new().with("id", id)
    }

    /// Set `name`, replacing an earlier value.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        match self.0.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    /// Raw value, including explicit nulls.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// The value rendered for a URL, or `None` when it is absent or unusable.
    pub fn rendered(&self, name: &str) -> Option<String> {
        self.get(name).and_then(render_identifier)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.rendered(name).is_some()
    }

    /// Names with usable values, in caller order.
    pub fn present_names(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, value)| render_identifier(value).is_some())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Fill names the caller left unset from `fallback`.
    pub fn fill_missing_from(&mut self, fallback: &Ids) {
        for (name, value) in &fallback.0 {
            if !self.is_present(name) {
                self.insert(name, value.clone());
            }
        }
    }
}

pub(crate) fn render_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Query parameters, in caller order; repeated keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.push((name.to_string(), value.into()));
        self
    }

    /// Parameters taken verbatim from an already-encoded query, such as a
    /// pagination cursor.
    pub fn from_query(query: &[(String, String)]) -> Self {
        Self(
            query
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Flatten into string pairs, skipping `excluded` names and nulls.
    pub fn to_query(&self, excluded: &[&str]) -> Vec<(String, String)> {
        let mut query = Vec::new();
        for (key, value) in &self.0 {
            if excluded.contains(&key.as_str()) {
                continue;
            }
            flatten_param(key, value, &mut query);
        }
        query
    }
}

fn flatten_param(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(text) => out.push((key.to_string(), text.clone())),
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
            out.push((key.to_string(), joined.join(",")));
        }
        Value::Object(map) => {
            for (sub, nested) in map {
                flatten_param(&format!("{key}[{sub}]"), nested, out);
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                out.push((key.to_string(), text));
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        nested => Some(nested.to_string()),
    }
}

/// Request body source for a write.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    None,
    /// Serialize the entity for saving and wrap it under its singular key.
    Entity(&'a Entity),
    /// Send this JSON verbatim.
    Raw(&'a Value),
}

/// Turns a resolved path plus ids, params and body into an [`HttpRequest`].
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    config: ClientConfig,
}

impl RequestBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for an already-resolved `path`.
    pub fn build(
        &self,
        session: &Session,
        entity: &EntityDescriptor,
        path: &PathDescriptor,
        ids: &Ids,
        params: &Params,
        body: Body<'_>,
    ) -> Result<HttpRequest> {
        let relative = substitute(path, ids)?;
        let url = format!(
            "{}/{}",
            self.config.base_url(&session.shop, entity.api_version),
            relative
        );
        let query = params.to_query(path.ids);

        let body = match (path.http_method, body) {
            (HttpMethod::Post | HttpMethod::Put, Body::Entity(instance)) => entity_body(instance)?,
            (_, Body::Raw(raw)) => Some(serde_json::to_string(raw)?),
            _ => None,
        };

        let mut headers = Vec::new();
        if let Some(credential) = session.credential_header() {
            headers.push(credential);
        }
        headers.push(("User-Agent".to_string(), self.config.user_agent()));
        headers.push(("Accept".to_string(), "application/json".to_string()));
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers.extend(self.config.extra_headers.iter().cloned());

        debug!(method = %path.http_method, url = %url, query_len = query.len(), "built request");
        Ok(HttpRequest {
            method: path.http_method,
            path: url,
            query,
            headers,
            body,
        })
    }
}

fn substitute(path: &PathDescriptor, ids: &Ids) -> Result<String> {
    let mut url = String::with_capacity(path.path.len());
    let mut rest = path.path;
    while let Some(start) = rest.find('<') {
        url.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('>').ok_or_else(|| RestResourceError::InvalidCatalogue {
            entity: String::new(),
            path: path.path.to_string(),
            reason: "unterminated placeholder".to_string(),
        })?;
        let name = &after[..end];
        let value = ids.rendered(name).ok_or_else(|| RestResourceError::NoMatchingPath {
            operation: path.operation.to_string(),
            method: path.http_method.to_string(),
            missing: vec![name.to_string()],
            candidates: vec![path.path.to_string()],
        })?;
        url.push_str(&urlencoding::encode(&value));
        rest = &after[end + 1..];
    }
    url.push_str(rest);
    Ok(url)
}

fn entity_body(entity: &Entity) -> Result<Option<String>> {
    let fields = serialize(entity, true);
    if fields.is_empty() {
        return Ok(None);
    }
    let mut wrapper = Map::new();
    wrapper.insert(entity.descriptor().singular_key().to_string(), Value::Object(fields));
    serde_json::to_string(&wrapper).map(Some).map_err(Error::from)
}
