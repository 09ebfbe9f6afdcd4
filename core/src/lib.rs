//! Resource-mapping engine for a commerce platform's admin REST API.
//!
//! # Overview
//! Entity types are described by static [`EntityDescriptor`] tables (URL
//! templates, response keys, read-only fields, relations). From those the
//! engine builds requests, locates payloads in responses, hydrates typed
//! entity graphs and extracts cursor pagination. Nothing here performs I/O:
//! a [`Transport`] supplied by the caller runs each request.
//!
//! # Design
//! - Descriptors are immutable `static` data; entity types are distinguished
//!   by descriptor, not by Rust type.
//! - Every operation is a `build_*` / `parse_*` pair on [`RestClient`], so
//!   the I/O boundary stays explicit.
//! - Integers are parsed with full precision and identifier fields
//!   (`id`, `*_id`, `*_ids`) are hydrated as strings.
//! - The session is held beside an entity's fields, never among them, so it
//!   cannot reach serialized output.

pub mod catalogue;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod hydrate;
pub mod pagination;
pub mod request;
pub mod resolver;
pub mod resources;
pub mod response;
pub mod serialize;
pub mod session;

pub use catalogue::{
    DescriptorRegistry, EntityDescriptor, PathDescriptor, Relation, RelationKind, Resource, ResourceNames,
};
pub use client::{CustomRequest, FindAllResponse, RestClient, RestResponse, Transport};
pub use config::ClientConfig;
pub use entity::{Entity, FieldValue};
pub use error::{Error, HttpResponseError, RestResourceError, Result};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use pagination::{PageInfo, PageQuery};
pub use request::{Body, Ids, Params, RequestBuilder};
pub use session::Session;
