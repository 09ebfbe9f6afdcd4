//! Behavioral guarantees of the mapping engine, checked end to end on a
//! small `Thing` table plus the bundled resources.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use shop_rest::hydrate::hydrate;
use shop_rest::pagination::extract_from_headers;
use shop_rest::resources::{Order, Product};
use shop_rest::serialize::serialize;
use shop_rest::{
    response, ClientConfig, Entity, EntityDescriptor, HttpMethod, Ids, Params, PathDescriptor, Resource,
    ResourceNames, RestClient, Session,
};

static THING: EntityDescriptor = EntityDescriptor {
    name: "Thing",
    api_version: "2024-01",
    resource_names: &[ResourceNames { singular: "thing", plural: "things" }],
    paths: &[
        PathDescriptor { http_method: HttpMethod::Get, operation: "get", ids: &["id"], path: "things/<id>.json" },
        PathDescriptor { http_method: HttpMethod::Get, operation: "get", ids: &[], path: "things.json" },
        PathDescriptor {
            http_method: HttpMethod::Get,
            operation: "get",
            ids: &["id", "other_resource_id"],
            path: "other_resources/<other_resource_id>/things/<id>.json",
        },
        PathDescriptor { http_method: HttpMethod::Post, operation: "post", ids: &[], path: "things.json" },
    ],
    fields: &["id", "ro", "w"],
    read_only: &["ro"],
    relations: &[],
};

fn session() -> Arc<Session> {
    Arc::new(Session::new("x.myshopify.com", "shpat_secret_marker"))
}

fn client() -> RestClient<()> {
    RestClient::new((), ClientConfig::default())
}

fn hydrate_body(descriptor: &'static EntityDescriptor, body: &str) -> Vec<Entity> {
    let parsed = response::parse(body, descriptor.resource_names).unwrap();
    shop_rest::hydrate::hydrate_payload(descriptor, parsed.payload, &session()).unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

const ORDER_BODY: &str = r#"{"order": {
    "id": 9007199254740999,
    "note": null,
    "tags": "vip",
    "customer": {
        "id": 9007199254741001,
        "email": "a@b.c",
        "default_address": {"id": 3, "customer_id": 9007199254741001}
    },
    "line_items": [
        {"id": 10, "variant_id": 9007199254741003, "quantity": 2},
        {"id": 11, "variant_id": 12, "quantity": 1}
    ],
    "discount_ids": [9007199254741005, 7]
}}"#;

#[test]
fn round_trip_preserves_fields_and_shape() {
    let first = hydrate_body(Order::DESCRIPTOR, ORDER_BODY).remove(0);

    // Re-emit as the server would, then parse again.
    let mut wrapper = Map::new();
    wrapper.insert("order".to_string(), Value::Object(serialize(&first, false)));
    let text = serde_json::to_string(&wrapper).unwrap();
    let second = hydrate_body(Order::DESCRIPTOR, &text).remove(0);

    assert_eq!(first, second);
    let address = second.one("customer").unwrap().one("default_address").unwrap();
    assert_eq!(address.str("customer_id"), Some("9007199254741001"));
    assert_eq!(second.many("line_items").len(), 2);
    assert_eq!(second.value("discount_ids"), Some(&json!(["9007199254741005", "7"])));
}

#[test]
fn identifiers_above_safe_integer_keep_their_digits() {
    for digits in ["9007199254740992", "9007199254740993", "12345678901234567890", "18446744073709551615"] {
        let body = format!(r#"{{"thing": {{"id": {digits}, "w": 1}}}}"#);
        let thing = hydrate_body(&THING, &body).remove(0);
        assert_eq!(thing.str("id"), Some(digits));
    }
}

#[test]
fn read_only_fields_only_leave_in_inspection_form() {
    let mut thing = Entity::new(&THING, session());
    thing.set("ro", "server-owned");
    thing.set("w", "mine");
    assert!(!serialize(&thing, true).contains_key("ro"));
    assert!(serialize(&thing, false).contains_key("ro"));
}

#[test]
fn session_never_leaks() {
    let order = hydrate_body(Order::DESCRIPTOR, ORDER_BODY).remove(0);
    for for_save in [true, false] {
        let text = serde_json::to_string(&serialize(&order, for_save)).unwrap();
        assert!(!text.to_lowercase().contains("session"));
        assert!(!text.contains("shpat_secret_marker"));
        assert!(!text.contains("x.myshopify.com"));
    }
    let text = serde_json::to_string(&order).unwrap();
    assert!(!text.contains("shpat_secret_marker"));
}

#[test]
fn more_specific_path_wins() {
    let ids = Ids::new().with("id", 1).with("other_resource_id", 2);
    let req = client().build_find(&session(), &THING, &ids, &Params::new()).unwrap();
    assert!(req.path.ends_with("/other_resources/2/things/1.json"), "{}", req.path);
}

#[test]
fn pagination_is_directional() {
    let first = extract_from_headers(
        &[("Link".to_string(), r#"<https://x/things.json?page_info=abc>; rel="next""#.to_string())],
        &[],
    );
    assert!(first.next_page.is_some());
    assert!(first.prev_page.is_none());

    let next = first.next_page.unwrap();
    let req = client()
        .build_all(&session(), &THING, &Ids::new(), &next.params())
        .unwrap();
    assert_eq!(req.query, vec![("page_info".to_string(), "abc".to_string())]);

    let second = extract_from_headers(
        &[("Link".to_string(), r#"<https://x/things.json?page_info=abc>; rel="previous""#.to_string())],
        &req.query,
    );
    assert!(second.next_page.is_none());
    assert!(second.prev_page.is_some());
}

#[test]
fn find_and_all_paths() {
    let c = client();
    let find = c.build_find(&session(), &THING, &Ids::id(1), &Params::new()).unwrap();
    assert_eq!(find.method, HttpMethod::Get);
    assert_eq!(find.path, "https://x.myshopify.com/admin/api/2024-01/things/1.json");

    let all = c.build_all(&session(), &THING, &Ids::new(), &Params::new()).unwrap();
    assert_eq!(all.method, HttpMethod::Get);
    assert_eq!(all.path, "https://x.myshopify.com/admin/api/2024-01/things.json");
}

#[test]
fn save_body_excludes_read_only() {
    let mut thing = Entity::new(&THING, session());
    thing.set("ro", "nope");
    thing.set("w", "x");
    let req = client().build_save(&thing).unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"thing": {"w": "x"}}));
}

#[test]
fn large_ids_hydrate_exactly() {
    let body = r#"{"thing": {"id": 9007199254740993, "child_id": 9007199254740994}}"#;
    let thing = hydrate_body(&THING, body).remove(0);
    assert_eq!(thing.str("id"), Some("9007199254740993"));
    assert_eq!(thing.str("child_id"), Some("9007199254740994"));
}

#[test]
fn link_header_yields_query() {
    let info = extract_from_headers(
        &[("Link".to_string(), r#"<https://x/things.json?page_info=abc>; rel="next""#.to_string())],
        &[],
    );
    assert_eq!(
        info.next_page.unwrap().query,
        vec![("page_info".to_string(), "abc".to_string())]
    );
}

#[test]
fn nested_entities_carry_the_session() {
    let session = session();
    let raw = object(json!({"id": 1, "variants": [{"id": 2}], "image": {"id": 3}}));
    let product = hydrate(Product::DESCRIPTOR, raw, &session);
    assert!(Arc::ptr_eq(product.many("variants")[0].session(), &session));
    assert!(Arc::ptr_eq(product.one("image").unwrap().session(), &session));
}
