//! Operation dispatch: `find`, `all`, `save`, `delete` and custom actions.
//!
//! # Design
//! Every operation is split the same way: a `build_*` method resolves the
//! path and produces an `HttpRequest`, a `parse_*` method turns the
//! `HttpResponse` into the caller-facing value. The async methods simply run
//! build, [`Transport::execute`], parse. Hosts that want to drive I/O
//! themselves call the build/parse halves directly; no transport is needed
//! for those.
//!
//! Each call issues exactly one request and keeps no state between calls.
//! Errors are surfaced as they happen; nothing is retried.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::catalogue::EntityDescriptor;
use crate::config::ClientConfig;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::hydrate::{hydrate, hydrate_payload};
use crate::pagination::{self, PageInfo};
use crate::request::{Body, Ids, Params, RequestBuilder};
use crate::resolver::resolve;
use crate::response::{check_status, parse as parse_body, parse_json};
use crate::session::Session;

/// Executes one HTTP round-trip.
///
/// Implementations own connection handling, timeouts and cancellation. A
/// completed exchange must be returned as `Ok` whatever its status code.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// Result of `all`: one page of entities and the cursors around it.
#[derive(Debug, Clone, PartialEq)]
pub struct FindAllResponse {
    pub data: Vec<Entity>,
    pub headers: Vec<(String, String)>,
    pub page_info: PageInfo,
}

/// Raw result of a custom action or delete.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub body: Value,
    pub headers: Vec<(String, String)>,
    pub page_info: PageInfo,
}

/// A non-standard operation from the path catalogue.
#[derive(Debug, Clone)]
pub struct CustomRequest<'a> {
    pub http_method: HttpMethod,
    pub operation: &'a str,
    pub ids: Ids,
    pub params: Params,
    pub body: Option<Value>,
    /// Instance whose identifier fields fill any ids not given explicitly.
    pub entity: Option<&'a Entity>,
    pub require_ids: bool,
}

impl<'a> CustomRequest<'a> {
    pub fn new(http_method: HttpMethod, operation: &'a str) -> Self {
        Self {
            http_method,
            operation,
            ids: Ids::new(),
            params: Params::new(),
            body: None,
            entity: None,
            require_ids: false,
        }
    }

    #[must_use]
    pub fn ids(mut self, ids: Ids) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn on(mut self, entity: &'a Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    #[must_use]
    pub fn require_ids(mut self) -> Self {
        self.require_ids = true;
        self
    }
}

/// Dispatches entity operations through a [`Transport`].
///
/// Holds no per-call state; `RestClient<()>` is enough for the build/parse halves.
#[derive(Debug, Clone)]
pub struct RestClient<T> {
    transport: T,
    builder: RequestBuilder,
}

impl<T> RestClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            builder: RequestBuilder::new(config),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// `GET` for a single entity; the primary `id` is mandatory.
    pub fn build_find(
        &self,
        session: &Session,
        descriptor: &'static EntityDescriptor,
        ids: &Ids,
        params: &Params,
    ) -> Result<HttpRequest> {
        let path = resolve(descriptor, HttpMethod::Get, "get", ids, true)?;
        self.builder.build(session, descriptor, path, ids, params, Body::None)
    }

    /// First entity of the located payload, `None` when there is none.
    pub fn parse_find(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        response: &HttpResponse,
    ) -> Result<Option<Entity>> {
        Ok(parse_entities(session, descriptor, response)?.into_iter().next())
    }

    /// `GET` for a collection, scoped by whatever ids are supplied.
    pub fn build_all(
        &self,
        session: &Session,
        descriptor: &'static EntityDescriptor,
        ids: &Ids,
        params: &Params,
    ) -> Result<HttpRequest> {
        let path = resolve(descriptor, HttpMethod::Get, "get", ids, false)?;
        self.builder.build(session, descriptor, path, ids, params, Body::None)
    }

    pub fn parse_all(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<FindAllResponse> {
        let data = parse_entities(session, descriptor, response)?;
        Ok(FindAllResponse {
            data,
            headers: response.headers.clone(),
            page_info: pagination::extract(response, &request.query),
        })
    }

    /// `PUT` when the entity has an `id`, `POST` otherwise.
    pub fn build_save(&self, entity: &Entity) -> Result<HttpRequest> {
        let (method, operation) = if entity.id().is_some() {
            (HttpMethod::Put, "put")
        } else {
            (HttpMethod::Post, "post")
        };
        let descriptor = entity.descriptor();
        let ids = entity.path_ids();
        let path = resolve(descriptor, method, operation, &ids, false)?;
        self.builder
            .build(entity.session(), descriptor, path, &ids, &Params::new(), Body::Entity(entity))
    }

    /// Check the outcome of a save; with `update`, refresh `entity` from the body.
    pub fn parse_save(&self, entity: &mut Entity, response: &HttpResponse, update: bool) -> Result<()> {
        check_status(response)?;
        if !update {
            return Ok(());
        }
        let descriptor = entity.descriptor();
        let parsed = parse_body(&response.body, descriptor.resource_names)?;
        if let (Some(_), Value::Object(map)) = (parsed.key, parsed.payload) {
            let fresh = hydrate(descriptor, map, entity.session());
            entity.absorb(fresh);
        }
        Ok(())
    }

    pub fn build_delete(&self, entity: &Entity) -> Result<HttpRequest> {
        let descriptor = entity.descriptor();
        let ids = entity.path_ids();
        let path = resolve(descriptor, HttpMethod::Delete, "delete", &ids, false)?;
        self.builder
            .build(entity.session(), descriptor, path, &ids, &Params::new(), Body::None)
    }

    pub fn build_request(
        &self,
        session: &Session,
        descriptor: &'static EntityDescriptor,
        custom: &CustomRequest<'_>,
    ) -> Result<HttpRequest> {
        let mut ids = custom.ids.clone();
        if let Some(entity) = custom.entity {
            ids.fill_missing_from(&entity.path_ids());
        }
        let path = resolve(descriptor, custom.http_method, custom.operation, &ids, custom.require_ids)?;
        let body = custom.body.as_ref().map_or(Body::None, Body::Raw);
        self.builder.build(session, descriptor, path, &ids, &custom.params, body)
    }

    /// The whole body, unlocated, plus headers and cursors.
    pub fn parse_raw(&self, request: &HttpRequest, response: &HttpResponse) -> Result<RestResponse> {
        check_status(response)?;
        Ok(RestResponse {
            body: parse_json(&response.body)?,
            headers: response.headers.clone(),
            page_info: pagination::extract(response, &request.query),
        })
    }
}

impl<T: Transport> RestClient<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.path, "sending request");
        let response = self.transport.execute(request.clone()).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    pub async fn find(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        ids: Ids,
        params: Params,
    ) -> Result<Option<Entity>> {
        let request = self.build_find(session, descriptor, &ids, &params)?;
        let response = self.send(&request).await?;
        self.parse_find(session, descriptor, &response)
    }

    pub async fn all(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        ids: Ids,
        params: Params,
    ) -> Result<FindAllResponse> {
        let request = self.build_all(session, descriptor, &ids, &params)?;
        let response = self.send(&request).await?;
        self.parse_all(session, descriptor, &request, &response)
    }

    /// Write the entity; the instance itself is left as the caller had it.
    pub async fn save(&self, entity: &mut Entity) -> Result<()> {
        let request = self.build_save(entity)?;
        let response = self.send(&request).await?;
        self.parse_save(entity, &response, false)
    }

    /// Write the entity and replace its fields with what the server returned.
    pub async fn save_and_update(&self, entity: &mut Entity) -> Result<()> {
        let request = self.build_save(entity)?;
        let response = self.send(&request).await?;
        self.parse_save(entity, &response, true)
    }

    pub async fn delete(&self, entity: &Entity) -> Result<RestResponse> {
        let request = self.build_delete(entity)?;
        let response = self.send(&request).await?;
        self.parse_raw(&request, &response)
    }

    pub async fn request(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        custom: CustomRequest<'_>,
    ) -> Result<RestResponse> {
        let request = self.build_request(session, descriptor, &custom)?;
        let response = self.send(&request).await?;
        self.parse_raw(&request, &response)
    }

    /// Run the catalogue's `count` operation and read its `count` member.
    pub async fn count(
        &self,
        session: &Arc<Session>,
        descriptor: &'static EntityDescriptor,
        ids: Ids,
        params: Params,
    ) -> Result<u64> {
        let custom = CustomRequest::new(HttpMethod::Get, "count").ids(ids).params(params);
        let response = self.request(session, descriptor, custom).await?;
        response
            .body
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::UnexpectedPayload {
                expected: "object with numeric `count`",
                found: response.body.to_string(),
            })
    }
}

fn parse_entities(
    session: &Arc<Session>,
    descriptor: &'static EntityDescriptor,
    response: &HttpResponse,
) -> Result<Vec<Entity>> {
    check_status(response)?;
    let parsed = parse_body(&response.body, descriptor.resource_names)?;
    if parsed.key.is_none() {
        return Ok(Vec::new());
    }
    hydrate_payload(descriptor, parsed.payload, session)
}
