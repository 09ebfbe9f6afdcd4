//! Live entity instances.
//!
//! # Design
//! An [`Entity`] is a descriptor-tagged bag of fields. Scalar fields hold
//! JSON values; relation fields hold nested entities. The session that
//! loaded or will save the entity lives outside the field map, so no
//! generic field walk (serialization, hydration, iteration) can reach it.
//! Nested entities carry their own clone of the same session handle.
//!
//! A field that was never set is absent from the map; a field set to
//! `null` is present as `FieldValue::Value(Value::Null)`. Serialization
//! relies on that distinction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::catalogue::{EntityDescriptor, Resource};
use crate::request::Ids;
use crate::session::Session;

/// A field slot: a plain JSON value or a hydrated relation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    One(Box<Entity>),
    Many(Vec<Entity>),
}

/// One instance of a resource, tagged with its descriptor.
///
/// The session travels beside the field map and never appears in it.
#[derive(Clone)]
pub struct Entity {
    descriptor: &'static EntityDescriptor,
    fields: BTreeMap<String, FieldValue>,
    session: Arc<Session>,
}

impl Entity {
    /// A fresh, unsaved instance with no fields set.
    pub fn new(descriptor: &'static EntityDescriptor, session: Arc<Session>) -> Self {
        Self {
            descriptor,
            fields: BTreeMap::new(),
            session,
        }
    }

    pub fn of<R: Resource>(session: Arc<Session>) -> Self {
        Self::new(R::DESCRIPTOR, session)
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Whether this instance is of resource type `R`.
    pub fn is<R: Resource>(&self) -> bool {
        self.descriptor.same_type(R::DESCRIPTOR)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Scalar value of `name`; `None` for relations and unset fields.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(FieldValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// The primary identifier, when the instance has one.
    pub fn id(&self) -> Option<String> {
        self.value("id").and_then(crate::request::render_identifier)
    }

    pub fn one(&self, name: &str) -> Option<&Entity> {
        match self.fields.get(name) {
            Some(FieldValue::One(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn one_mut(&mut self, name: &str) -> Option<&mut Entity> {
        match self.fields.get_mut(name) {
            Some(FieldValue::One(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Nested entities of a many-relation, empty when unset.
    pub fn many(&self, name: &str) -> &[Entity] {
        match self.fields.get(name) {
            Some(FieldValue::Many(entities)) => entities,
            _ => &[],
        }
    }

    pub fn many_mut(&mut self, name: &str) -> Option<&mut Vec<Entity>> {
        match self.fields.get_mut(name) {
            Some(FieldValue::Many(entities)) => Some(entities),
            _ => None,
        }
    }

    /// Set a scalar field. `Value::Null` records an explicit null.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), FieldValue::Value(value.into()));
    }

    pub fn set_one(&mut self, name: &str, entity: Entity) {
        self.fields.insert(name.to_string(), FieldValue::One(Box::new(entity)));
    }

    pub fn set_many(&mut self, name: &str, entities: Vec<Entity>) {
        self.fields.insert(name.to_string(), FieldValue::Many(entities));
    }

    pub(crate) fn set_field(&mut self, name: String, value: FieldValue) {
        self.fields.insert(name, value);
    }

    /// Forget a field entirely, as if it had never been set.
    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Replace every field with those of `other`, keeping this session.
    pub(crate) fn absorb(&mut self, other: Entity) {
        self.fields = other.fields;
    }

    /// Identifier values found on this instance for every name its paths use.
    pub fn path_ids(&self) -> Ids {
        let mut ids = Ids::new();
        for name in self.descriptor.identifier_names() {
            if let Some(value) = self.value(name) {
                ids.insert(name, value.clone());
            }
        }
        ids
    }
}

impl PartialEq for Entity {
    /// Same type and same fields; the session is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.same_type(other.descriptor) && self.fields == other.fields
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.descriptor.name)
            .field("api_version", &self.descriptor.api_version)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Serialize for Entity {
    /// Inspection form: every field, read-only ones included.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::serialize::serialize(self, false).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::{Product, Variant};

    fn session() -> Arc<Session> {
        Arc::new(Session::new("example.myshopify.com", "tok"))
    }

    #[test]
    fn set_null_differs_from_unset() {
        let mut product = Entity::of::<Product>(session());
        assert!(product.get("image").is_none());
        product.set("image", Value::Null);
        assert_eq!(product.get("image"), Some(&FieldValue::Value(Value::Null)));
        product.unset("image");
        assert!(product.get("image").is_none());
    }

    #[test]
    fn id_renders_numbers_and_strings() {
        let mut product = Entity::of::<Product>(session());
        assert!(product.id().is_none());
        product.set("id", 42);
        assert_eq!(product.id().as_deref(), Some("42"));
        product.set("id", "9007199254740993");
        assert_eq!(product.id().as_deref(), Some("9007199254740993"));
    }

    #[test]
    fn type_discrimination_by_descriptor() {
        let variant = Entity::of::<Variant>(session());
        assert!(variant.is::<Variant>());
        assert!(!variant.is::<Product>());
    }

    #[test]
    fn path_ids_collects_known_identifier_fields() {
        let mut variant = Entity::of::<Variant>(session());
        variant.set("id", "1");
        variant.set("product_id", "2");
        variant.set("title", "Small");
        let ids = variant.path_ids();
        assert_eq!(ids.rendered("id").as_deref(), Some("1"));
        assert_eq!(ids.rendered("product_id").as_deref(), Some("2"));
        assert!(ids.get("title").is_none());
    }

    #[test]
    fn debug_and_serialize_never_show_session() {
        let mut product = Entity::of::<Product>(session());
        product.set("title", "Hat");
        let printed = format!("{product:?}");
        assert!(printed.starts_with("Product"));
        assert!(!printed.contains("tok"));
        assert_eq!(serde_json::to_value(&product).unwrap(), json!({"title": "Hat"}));
    }
}
