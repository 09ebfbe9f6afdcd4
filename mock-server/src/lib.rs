use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// First id handed out; deliberately above 2^53.
pub const FIRST_ID: u64 = 9_007_199_254_740_993;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 250;

const CREATED_AT: &str = "2024-01-02T09:00:00-05:00";
const TOKEN_HEADER: &str = "x-shopify-access-token";

#[derive(Debug)]
pub struct Store {
    products: BTreeMap<u64, Value>,
    next_id: u64,
    /// Opaque cursor token to list offset.
    cursors: HashMap<String, usize>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            next_id: FIRST_ID,
            cursors: HashMap::new(),
        }
    }
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn cursor(&mut self, offset: usize) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.cursors.insert(token.clone(), offset);
        token
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/admin/api/{version}/products.json", get(list_products).post(create_product))
        .route(
            "/admin/api/{version}/products/{file}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reply(status: StatusCode, body: Value) -> Response {
    let request_id = Uuid::new_v4().to_string();
    (status, [("x-request-id", request_id)], Json(body)).into_response()
}

fn not_found() -> Response {
    reply(StatusCode::NOT_FOUND, json!({"errors": "Not Found"}))
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let token = headers.get(TOKEN_HEADER).and_then(|value| value.to_str().ok());
    match token {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(reply(
            StatusCode::UNAUTHORIZED,
            json!({"errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"}),
        )),
    }
}

/// `"123.json"` into `123`.
fn parse_id(file: &str) -> Option<u64> {
    file.strip_suffix(".json")?.parse().ok()
}

fn restrict_fields(product: &Value, fields: Option<&String>) -> Value {
    let (Some(fields), Value::Object(map)) = (fields, product) else {
        return product.clone();
    };
    let wanted: Vec<&str> = fields.split(',').map(str::trim).collect();
    Value::Object(
        map.iter()
            .filter(|(key, _)| wanted.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

async fn list_products(
    State(db): State<Db>,
    Path(version): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let limit = query
        .get("limit")
        .and_then(|limit| limit.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT);

    let mut store = db.write().await;
    let offset = match query.get("page_info") {
        Some(token) => match store.cursors.get(token) {
            Some(offset) => *offset,
            None => {
                return reply(
                    StatusCode::BAD_REQUEST,
                    json!({"errors": {"page_info": "Invalid value."}}),
                )
            }
        },
        None => 0,
    };

    let total = store.products.len();
    let page: Vec<Value> = store
        .products
        .values()
        .skip(offset)
        .take(limit)
        .map(|product| restrict_fields(product, query.get("fields")))
        .collect();

    let host = headers
        .get("host")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
        .to_string();
    let fields = query
        .get("fields")
        .map(|fields| format!("&fields={}", fields.replace(',', "%2C")))
        .unwrap_or_default();
    let page_url = format!("http://{host}/admin/api/{version}/products.json?limit={limit}{fields}");
    let mut links = Vec::new();
    if offset > 0 {
        let token = store.cursor(offset.saturating_sub(limit));
        links.push(format!("<{page_url}&page_info={token}>; rel=\"previous\""));
    }
    if offset + limit < total {
        let token = store.cursor(offset + limit);
        links.push(format!("<{page_url}&page_info={token}>; rel=\"next\""));
    }

    let mut response = reply(StatusCode::OK, json!({ "products": page }));
    if !links.is_empty() {
        if let Ok(value) = links.join(", ").parse() {
            response.headers_mut().insert("link", value);
        }
    }
    response
}

async fn create_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let Some(Value::Object(input)) = body.get("product").cloned() else {
        return reply(
            StatusCode::BAD_REQUEST,
            json!({"errors": {"product": "Required parameter missing or invalid"}}),
        );
    };
    let title = input.get("title").and_then(Value::as_str).unwrap_or_default().to_string();
    if title.trim().is_empty() {
        return reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"errors": {"title": ["can't be blank"]}}),
        );
    }

    let mut store = db.write().await;
    let id = store.allocate_id();
    let mut product = Map::new();
    for (key, value) in input {
        if !matches!(key.as_str(), "id" | "created_at" | "handle" | "variants") {
            product.insert(key, value);
        }
    }
    let handle = title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    product.insert("id".to_string(), json!(id));
    product.insert("handle".to_string(), json!(handle));
    product.insert("created_at".to_string(), json!(CREATED_AT));

    let requested_variants = body["product"]["variants"].as_array().cloned().unwrap_or_default();
    let mut variants = Vec::new();
    for requested in requested_variants {
        let mut variant = requested.as_object().cloned().unwrap_or_default();
        variant.insert("id".to_string(), json!(store.allocate_id()));
        variant.insert("product_id".to_string(), json!(id));
        variant.insert("inventory_quantity".to_string(), json!(0));
        variants.push(Value::Object(variant));
    }
    product.insert("variants".to_string(), Value::Array(variants));

    let product = Value::Object(product);
    store.products.insert(id, product.clone());
    reply(StatusCode::CREATED, json!({ "product": product }))
}

async fn get_product(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let store = db.read().await;
    if file == "count.json" {
        return reply(StatusCode::OK, json!({ "count": store.products.len() }));
    }
    let Some(id) = parse_id(&file) else {
        return not_found();
    };
    match store.products.get(&id) {
        Some(product) => reply(
            StatusCode::OK,
            json!({ "product": restrict_fields(product, query.get("fields")) }),
        ),
        None => not_found(),
    }
}

async fn update_product(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let Some(id) = parse_id(&file) else {
        return not_found();
    };
    let mut store = db.write().await;
    let Some(Value::Object(product)) = store.products.get_mut(&id) else {
        return not_found();
    };
    if let Some(Value::Object(changes)) = body.get("product") {
        for (key, value) in changes {
            if !matches!(key.as_str(), "id" | "created_at" | "variants") {
                product.insert(key.clone(), value.clone());
            }
        }
    }
    let product = Value::Object(product.clone());
    reply(StatusCode::OK, json!({ "product": product }))
}

async fn delete_product(
    State(db): State<Db>,
    Path((_version, file)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let Some(id) = parse_id(&file) else {
        return not_found();
    };
    match db.write().await.products.remove(&id) {
        Some(_) => reply(StatusCode::OK, json!({})),
        None => not_found(),
    }
}
