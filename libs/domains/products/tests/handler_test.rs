//! Handler tests for Products domain
//!
//! These drive the product router end to end over the in-memory repository:
//! - Request deserialization (JSON and query string)
//! - Response serialization and status codes (200/204/400)
//! - Error bodies for missing products and malformed input

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

fn app() -> axum::Router {
    handlers::router(InMemoryProductRepository::new())
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = app();

    // add
    let response = send(
        &app,
        "POST",
        "/add",
        Some(json!({"id": 85, "name": "Produto Teste", "description": "Teste", "mount": 50})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let added: Product = json_body(response.into_body()).await;
    assert_eq!(added, Product::new(85, "Produto Teste", "Teste", 50));

    // get
    let response = send(&app, "GET", "/get?id=85", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, added);

    // update
    let response = send(
        &app,
        "PUT",
        "/update",
        Some(json!({
            "id": 85,
            "name": "Produto Atualizado",
            "description": "Atualizado",
            "mount": 10
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Produto Atualizado");
    assert_eq!(updated.mount, 10);

    // remove
    let response = send(&app, "DELETE", "/remove?id=85", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({"message": "Product deleted successfully"}));

    // gone
    let response = send(&app, "GET", "/get?id=85", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_unknown_product_returns_204_without_body() {
    let response = send(&app(), "GET", "/get?id=123", None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_remove_unknown_product_returns_400() {
    let response = send(&app(), "DELETE", "/remove?id=99999", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "The requested product was not found");
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_update_unknown_product_returns_400_and_stores_nothing() {
    let app = app();

    let response = send(
        &app,
        "PUT",
        "/update",
        Some(json!({"id": 4242, "name": "ghost", "description": "", "mount": 0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "No product found with id 4242");

    let response = send(&app, "GET", "/get-all", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_all_returns_every_product_in_id_order() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("handler_get_all");

    for id in [3, 1, 2] {
        let response = send(
            &app,
            "POST",
            "/add",
            Some(json!({
                "id": id,
                "name": builder.name("product", &id.to_string()),
                "description": "listed",
                "mount": builder.mount()
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, "GET", "/get-all", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_get_all_on_empty_store_returns_204() {
    let response = send(&app(), "GET", "/get-all", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_add_without_id_gets_one_assigned() {
    let app = app();

    let response = send(
        &app,
        "POST",
        "/add",
        Some(json!({"name": "Keyboard", "description": "Mechanical", "mount": -2})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let added: Product = json_body(response.into_body()).await;
    assert_ne!(added.id, 0);
    assert_eq!(added.mount, -2);

    let response = send(&app, "GET", &format!("/get?id={}", added.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/add")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_missing_id_query_returns_400() {
    let response = send(&app(), "DELETE", "/remove", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "QUERY_EXTRACTION");
}
