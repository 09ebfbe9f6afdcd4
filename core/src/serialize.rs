//! Turning entities back into plain JSON objects.
//!
//! The save form drops read-only fields at every depth; the inspection form
//! keeps them. Neither form ever contains the session.

use serde_json::{Map, Value};

use crate::entity::{Entity, FieldValue};

/// Key spellings reserved for the session back-reference.
const SESSION_KEYS: &[&str] = &["session", "#session", "_session", "__session", "$session"];

pub fn is_session_key(key: &str) -> bool {
    SESSION_KEYS.iter().any(|reserved| reserved.eq_ignore_ascii_case(key))
}

/// Plain-object form of `entity`. With `for_save`, read-only fields are left out.
pub fn serialize(entity: &Entity, for_save: bool) -> Map<String, Value> {
    let descriptor = entity.descriptor();
    let mut out = Map::new();
    for (name, field) in entity.fields() {
        if is_session_key(name) || (for_save && descriptor.is_read_only(name)) {
            continue;
        }
        let value = match field {
            FieldValue::Value(value) => value.clone(),
            FieldValue::One(child) => Value::Object(serialize(child, for_save)),
            FieldValue::Many(children) => Value::Array(
                children
                    .iter()
                    .map(|child| Value::Object(serialize(child, for_save)))
                    .collect(),
            ),
        };
        out.insert(name.to_string(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::resources::{Image, Product, Variant};
    use crate::session::Session;

    fn session() -> Arc<Session> {
        Arc::new(Session::new("example.myshopify.com", "tok"))
    }

    #[test]
    fn read_only_fields_only_in_inspection_form() {
        let mut product = Entity::of::<Product>(session());
        product.set("title", "Hat");
        product.set("created_at", "2024-01-01T00:00:00Z");

        assert_eq!(Value::Object(serialize(&product, true)), json!({"title": "Hat"}));
        assert_eq!(
            Value::Object(serialize(&product, false)),
            json!({"title": "Hat", "created_at": "2024-01-01T00:00:00Z"})
        );
    }

    #[test]
    fn nested_relations_honor_read_only_flag() {
        let mut variant = Entity::of::<Variant>(session());
        variant.set("price", "5.00");
        variant.set("inventory_quantity", 3);
        let mut product = Entity::of::<Product>(session());
        product.set_many("variants", vec![variant]);

        assert_eq!(
            Value::Object(serialize(&product, true)),
            json!({"variants": [{"price": "5.00"}]})
        );
        assert_eq!(
            Value::Object(serialize(&product, false)),
            json!({"variants": [{"price": "5.00", "inventory_quantity": 3}]})
        );
    }

    #[test]
    fn explicit_null_is_kept() {
        let mut product = Entity::of::<Product>(session());
        product.set("image", Value::Null);
        assert_eq!(Value::Object(serialize(&product, true)), json!({"image": null}));

        let mut product = Entity::of::<Product>(session());
        product.set_one("image", Entity::of::<Image>(session()));
        product.unset("image");
        assert!(serialize(&product, true).is_empty());
    }

    #[test]
    fn session_spellings_are_never_emitted() {
        let mut product = Entity::of::<Product>(session());
        for key in ["session", "#session", "_session", "Session"] {
            product.set(key, json!({"access_token": "tok"}));
        }
        product.set("title", "Hat");
        for for_save in [true, false] {
            let text = serde_json::to_string(&serialize(&product, for_save)).unwrap();
            assert!(!text.contains("session"), "{text}");
            assert!(!text.contains("tok"), "{text}");
        }
    }
}
