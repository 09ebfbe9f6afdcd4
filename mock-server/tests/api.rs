use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, FIRST_ID};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "shpat_test";
const BASE: &str = "/admin/api/2024-01";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "shop.test")
        .header("x-shopify-access-token", TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    request("GET", uri, "")
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("{BASE}/products.json"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-request-id"));
    let body = body_json(resp).await;
    assert!(body["errors"].as_str().unwrap().contains("access token"));
}

// --- list ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(get(&format!("{BASE}/products.json"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("link").is_none());
    let body = body_json(resp).await;
    assert_eq!(body["products"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_cursor_is_rejected() {
    let resp = app()
        .oneshot(get(&format!("{BASE}/products.json?page_info=nope")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_product_returns_201_with_large_id() {
    let resp = app()
        .oneshot(request(
            "POST",
            &format!("{BASE}/products.json"),
            r#"{"product":{"title":"Burton Custom","variants":[{"price":"10.00"}]}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let raw = body_bytes(resp).await;
    let text = std::str::from_utf8(&raw).unwrap();
    assert!(text.contains(&format!("\"id\":{FIRST_ID}")));
    let body: Value = serde_json::from_str(text).unwrap();
    assert_eq!(body["product"]["handle"], "burton-custom");
    assert_eq!(body["product"]["variants"][0]["price"], "10.00");
}

#[tokio::test]
async fn create_without_title_returns_422() {
    let resp = app()
        .oneshot(request("POST", &format!("{BASE}/products.json"), r#"{"product":{"vendor":"Acme"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"]["title"][0], "can't be blank");
}

#[tokio::test]
async fn create_without_wrapper_returns_400() {
    let resp = app()
        .oneshot(request("POST", &format!("{BASE}/products.json"), r#"{"title":"Bare"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_product_not_found() {
    let resp = app().oneshot(get(&format!("{BASE}/products/1.json"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["errors"], "Not Found");
}

#[tokio::test]
async fn update_product_not_found() {
    let resp = app()
        .oneshot(request("PUT", &format!("{BASE}/products/1.json"), r#"{"product":{"title":"Nope"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app()
        .oneshot(request("DELETE", &format!("{BASE}/products/1.json"), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle with pagination ---

#[tokio::test]
async fn lifecycle_with_cursor_pagination() {
    use tower::Service;

    let mut app = app().into_service();

    for title in ["One", "Two", "Three"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(request(
                "POST",
                &format!("{BASE}/products.json"),
                &format!(r#"{{"product":{{"title":"{title}"}}}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // count
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("{BASE}/products/count.json")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["count"], 3);

    // first page advertises only next
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("{BASE}/products.json?limit=2&fields=id,title")))
        .await
        .unwrap();
    let link = resp.headers()["link"].to_str().unwrap().to_string();
    assert!(link.contains("rel=\"next\""));
    assert!(!link.contains("rel=\"previous\""));
    let first_page = "<http://shop.test/admin/api/2024-01/products.json?limit=2&fields=id%2Ctitle&page_info=";
    assert!(link.starts_with(first_page));
    let body = body_json(resp).await;
    let page = body["products"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].get("handle").is_none());

    // follow the cursor: second page advertises only previous
    let next = link
        .split_once("page_info=")
        .unwrap()
        .1
        .split_once('>')
        .unwrap()
        .0
        .to_string();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("{BASE}/products.json?limit=2&page_info={next}")))
        .await
        .unwrap();
    let link = resp.headers()["link"].to_str().unwrap().to_string();
    assert!(link.contains("rel=\"previous\""));
    assert!(!link.contains("rel=\"next\""));
    let body = body_json(resp).await;
    assert_eq!(body["products"][0]["title"], "Three");

    // update then fetch
    let id = FIRST_ID;
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request(
            "PUT",
            &format!("{BASE}/products/{id}.json"),
            r#"{"product":{"title":"Uno","created_at":"ignored"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["product"]["title"], "Uno");
    assert_ne!(body["product"]["created_at"], "ignored");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("{BASE}/products/{id}.json"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({}));

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("{BASE}/products/{id}.json")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
