//! Declarative descriptions of remote resources.
//!
//! # Design
//! Every entity type is one `static` [`EntityDescriptor`]: its URL
//! templates, response-body key names, read-only fields and relations. The
//! descriptors are immutable data shared by every call, so concurrent
//! operations need no coordination. Relations point at other descriptors by
//! `&'static` reference, which lets tables refer to each other freely.

use std::collections::HashMap;
use std::fmt;

use crate::error::RestResourceError;
use crate::http::HttpMethod;

/// One entry of a resource's path catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathDescriptor {
    pub http_method: HttpMethod,
    /// Logical operation name, e.g. `get`, `post`, `count`.
    pub operation: &'static str,
    /// Identifiers the template needs, in placeholder order.
    pub ids: &'static [&'static str],
    /// Template relative to the versioned API root, with `<name>` placeholders.
    pub path: &'static str,
}

impl PathDescriptor {
    /// Placeholder names in the order they appear in the template.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else { break };
            names.push(&after[..end]);
            rest = &after[end + 1..];
        }
        names
    }
}

/// A pair of response-body keys under which a resource may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceNames {
    pub singular: &'static str,
    pub plural: &'static str,
}

/// Cardinality of a relation: one nested object or an array of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    One,
    Many,
}

/// A nested field hydrated as another entity type.
#[derive(Clone, Copy)]
pub struct Relation {
    pub field: &'static str,
    pub kind: RelationKind,
    pub target: &'static EntityDescriptor,
}

impl fmt::Debug for Relation {
    // The target is printed by name only; relation graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("field", &self.field)
            .field("kind", &self.kind)
            .field("target", &self.target.name)
            .finish()
    }
}

/// Everything the engine knows about one entity type at one API version.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub api_version: &'static str,
    /// First entry is canonical; later entries are accepted aliases.
    pub resource_names: &'static [ResourceNames],
    pub paths: &'static [PathDescriptor],
    pub fields: &'static [&'static str],
    pub read_only: &'static [&'static str],
    pub relations: &'static [Relation],
}

impl EntityDescriptor {
    /// Canonical singular key, used to wrap write bodies.
    pub fn singular_key(&self) -> &'static str {
        self.resource_names.first().map_or(self.name, |names| names.singular)
    }

    pub fn plural_key(&self) -> &'static str {
        self.resource_names.first().map_or(self.name, |names| names.plural)
    }

    pub fn relation(&self, field: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.field == field)
    }

    pub fn is_read_only(&self, field: &str) -> bool {
        self.read_only.contains(&field)
    }

    pub fn is_known_field(&self, field: &str) -> bool {
        self.fields.contains(&field) || self.relation(field).is_some()
    }

    /// Every identifier name referenced by any path, first occurrence order.
    pub fn identifier_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for id in self.paths.iter().flat_map(|path| path.ids.iter()) {
            if !names.contains(id) {
                names.push(id);
            }
        }
        names
    }

    /// Descriptors are identified by name and pinned version.
    pub fn same_type(&self, other: &EntityDescriptor) -> bool {
        std::ptr::eq(self, other) || (self.name == other.name && self.api_version == other.api_version)
    }

    /// Check that every template's placeholders match its identifier list.
    pub fn validate(&self) -> Result<(), RestResourceError> {
        if self.resource_names.is_empty() {
            return Err(RestResourceError::InvalidCatalogue {
                entity: self.name.to_string(),
                path: String::new(),
                reason: "no resource names declared".to_string(),
            });
        }
        for path in self.paths {
            let placeholders = path.placeholders();
            let invalid = |reason: String| RestResourceError::InvalidCatalogue {
                entity: self.name.to_string(),
                path: path.path.to_string(),
                reason,
            };
            if let Some(name) = placeholders.iter().find(|name| !path.ids.contains(name)) {
                return Err(invalid(format!("placeholder `{name}` is not a declared id")));
            }
            if let Some(id) = path.ids.iter().find(|id| !placeholders.contains(id)) {
                return Err(invalid(format!("id `{id}` has no placeholder")));
            }
        }
        Ok(())
    }
}

/// Nominal handle for a generated entity type.
pub trait Resource {
    const DESCRIPTOR: &'static EntityDescriptor;
}

/// Descriptor lookup keyed by entity name and API version.
#[derive(Debug, Default, Clone)]
pub struct DescriptorRegistry {
    entries: HashMap<(&'static str, &'static str), &'static EntityDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` and, transitively, every relation target.
    pub fn register(&mut self, descriptor: &'static EntityDescriptor) {
        let key = (descriptor.name, descriptor.api_version);
        if self.entries.insert(key, descriptor).is_some() {
            return;
        }
        for relation in descriptor.relations {
            self.register(relation.target);
        }
    }

    pub fn get(&self, name: &str, api_version: &str) -> Option<&'static EntityDescriptor> {
        self.entries.get(&(name, api_version)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate every registered descriptor.
    pub fn validate(&self) -> Result<(), RestResourceError> {
        self.entries.values().try_for_each(|descriptor| descriptor.validate())
    }
}
