//! Building entities from parsed response payloads.
//!
//! Relation fields are hydrated with the target descriptor. Every other
//! field, known or not, is copied as-is after identifier normalization:
//! any value under `id`, `*_id` or `*_ids`, at any depth, becomes a string
//! holding the exact digits the server sent.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::catalogue::{EntityDescriptor, RelationKind};
use crate::entity::{Entity, FieldValue};
use crate::error::{Error, Result};
use crate::session::Session;

pub fn is_identifier_key(key: &str) -> bool {
    key == "id" || key.ends_with("_id") || key.ends_with("_ids")
}

/// Hydrate a single entity from a JSON object.
pub fn hydrate(descriptor: &'static EntityDescriptor, raw: Map<String, Value>, session: &Arc<Session>) -> Entity {
    let mut entity = Entity::new(descriptor, Arc::clone(session));
    for (key, value) in raw {
        let field = match descriptor.relation(&key) {
            Some(relation) => match (relation.kind, value) {
                (RelationKind::One, Value::Object(map)) => {
                    FieldValue::One(Box::new(hydrate(relation.target, map, session)))
                }
                (RelationKind::Many, Value::Array(items)) if items.iter().all(Value::is_object) => {
                    FieldValue::Many(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::Object(map) => Some(hydrate(relation.target, map, session)),
                                _ => None,
                            })
                            .collect(),
                    )
                }
                (_, other) => FieldValue::Value(normalize_field(&key, other)),
            },
            None => FieldValue::Value(normalize_field(&key, value)),
        };
        entity.set_field(key, field);
    }
    entity
}

/// Hydrate each element of a list payload.
pub fn hydrate_list(
    descriptor: &'static EntityDescriptor,
    raw: Vec<Value>,
    session: &Arc<Session>,
) -> Result<Vec<Entity>> {
    raw.into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(hydrate(descriptor, map, session)),
            other => Err(Error::UnexpectedPayload {
                expected: "object",
                found: kind_of(&other).to_string(),
            }),
        })
        .collect()
}

/// Hydrate whatever a located payload holds: one object or a list of them.
pub fn hydrate_payload(
    descriptor: &'static EntityDescriptor,
    payload: Value,
    session: &Arc<Session>,
) -> Result<Vec<Entity>> {
    match payload {
        Value::Object(map) => Ok(vec![hydrate(descriptor, map, session)]),
        Value::Array(items) => hydrate_list(descriptor, items, session),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::UnexpectedPayload {
            expected: "object or array",
            found: kind_of(&other).to_string(),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize the value bound to `key`.
pub fn normalize_field(key: &str, value: Value) -> Value {
    if is_identifier_key(key) {
        identifier_to_string(value)
    } else {
        normalize_nested(value)
    }
}

fn identifier_to_string(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::String(number.to_string()),
        Value::Array(items) => Value::Array(items.into_iter().map(identifier_to_string).collect()),
        other => normalize_nested(other),
    }
}

fn normalize_nested(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, nested)| {
                    let normalized = normalize_field(&key, nested);
                    (key, normalized)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_nested).collect()),
        other => other,
    }
}
