use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use axum_helpers::{
    JsonBody, QueryParams,
    errors::responses::{BadRequestQueryResponse, BadRequestResponse, InternalServerErrorResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::error::{ProductError, ProductResult};
use crate::models::{MessageResponse, Product, ProductIdQuery};
use crate::repository::ProductRepository;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(add_product, update_product, remove_product, get_product, get_all_products),
    components(
        schemas(Product, MessageResponse),
        responses(BadRequestResponse, BadRequestQueryResponse, InternalServerErrorResponse)
    ),
    tags(
        (
            name = entity::Model::TAG,
            description = "Product management endpoints. Errors are JSON objects \
                `{code, error, message}` rather than plain strings, a successful \
                remove returns `{\"message\": ...}`, and 204 responses have no body."
        )
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(repository: R) -> Router {
    let shared_repository = Arc::new(repository);

    Router::new()
        .route("/add", post(add_product))
        .route("/update", put(update_product))
        .route("/remove", delete(remove_product))
        .route("/get", get(get_product))
        .route("/get-all", get(get_all_products))
        .with_state(shared_repository)
}

/// Add a product
#[utoipa::path(
    post,
    path = "/add",
    tag = entity::Model::TAG,
    request_body = Product,
    responses(
        (status = 200, description = "Product added", body = Product),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: ProductRepository>(
    State(repository): State<Arc<R>>,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    let product = repository.add(product).await?;
    Ok(Json(product))
}

/// Replace every field of an existing product
#[utoipa::path(
    put,
    path = "/update",
    tag = entity::Model::TAG,
    request_body = Product,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(repository): State<Arc<R>>,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    if repository.get_by_id(product.id).await?.is_none() {
        return Err(ProductError::NotFound(product.id));
    }

    let product = repository.update(product).await?;
    Ok(Json(product))
}

/// Remove a product by ID
#[utoipa::path(
    delete,
    path = "/remove",
    tag = entity::Model::TAG,
    params(ProductIdQuery),
    responses(
        (status = 200, description = "Product removed", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_product<R: ProductRepository>(
    State(repository): State<Arc<R>>,
    QueryParams(ProductIdQuery { id }): QueryParams<ProductIdQuery>,
) -> ProductResult<Json<MessageResponse>> {
    if repository.get_by_id(id).await?.is_none() {
        return Err(ProductError::NothingToRemove(id));
    }

    repository.remove(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/get",
    tag = entity::Model::TAG,
    params(ProductIdQuery),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 204, description = "No product with this id"),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(repository): State<Arc<R>>,
    QueryParams(ProductIdQuery { id }): QueryParams<ProductIdQuery>,
) -> ProductResult<Response> {
    match repository.get_by_id(id).await? {
        Some(product) => Ok(Json(product).into_response()),
        None => {
            tracing::info!(product_id = id, "No product found with id {}", id);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// List all products
#[utoipa::path(
    get,
    path = "/get-all",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "All products, ascending by id", body = Vec<Product>),
        (status = 204, description = "No products stored"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_all_products<R: ProductRepository>(
    State(repository): State<Arc<R>>,
) -> ProductResult<Response> {
    let products = repository.get_all().await?;

    if products.is_empty() {
        tracing::info!("No products found in the database");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(products).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use mockall::predicate::eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_doc_describes_body_shapes() {
        let doc = ApiDoc::openapi();
        let tag = doc
            .tags
            .unwrap()
            .into_iter()
            .find(|t| t.name == entity::Model::TAG)
            .unwrap();

        let description = tag.description.unwrap();
        assert!(description.contains("{code, error, message}"));
        assert!(description.contains("204"));
    }

    #[tokio::test]
    async fn test_update_missing_product_never_calls_update() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_update().never();

        let response = router(repo)
            .oneshot(json_request(
                "PUT",
                "/update",
                json!({"id": 7, "name": "x", "description": "y", "mount": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "No product found with id 7"
        );
    }

    #[tokio::test]
    async fn test_update_existing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(85))
            .returning(|id| Ok(Some(Product::new(id, "old", "old", 1))));
        repo.expect_update()
            .times(1)
            .returning(|product| Ok(product));

        let response = router(repo)
            .oneshot(json_request(
                "PUT",
                "/update",
                json!({"id": 85, "name": "new", "description": "new", "mount": 2}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "new");
    }

    #[tokio::test]
    async fn test_remove_missing_product_never_calls_remove() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_remove().never();

        let response = router(repo)
            .oneshot(empty_request("DELETE", "/remove?id=99999"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "The requested product was not found"
        );
    }

    #[tokio::test]
    async fn test_remove_existing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(|id| Ok(Some(Product::new(id, "p", "", 0))));
        repo.expect_remove()
            .with(eq(85))
            .times(1)
            .returning(|_| Ok(()));

        let response = router(repo)
            .oneshot(empty_request("DELETE", "/remove?id=85"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Product deleted successfully"})
        );
    }

    #[tokio::test]
    async fn test_get_missing_product_is_no_content() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let response = router(repo)
            .oneshot(empty_request("GET", "/get?id=123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_empty_is_no_content() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_all().returning(|| Ok(vec![]));

        let response = router(repo)
            .oneshot(empty_request("GET", "/get-all"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_repository_failures_return_generic_500() {
        let failing = || {
            let mut repo = MockProductRepository::new();
            repo.expect_add()
                .returning(|_| Err(ProductError::Internal("store offline".into())));
            repo.expect_get_by_id()
                .returning(|_| Err(ProductError::Internal("store offline".into())));
            repo.expect_get_all()
                .returning(|| Err(ProductError::Internal("store offline".into())));
            repo
        };

        let product = json!({"id": 1, "name": "a", "description": "b", "mount": 1});
        let requests = vec![
            json_request("POST", "/add", product.clone()),
            json_request("PUT", "/update", product),
            empty_request("DELETE", "/remove?id=1"),
            empty_request("GET", "/get?id=1"),
            empty_request("GET", "/get-all"),
        ];

        for request in requests {
            let uri = request.uri().to_string();
            let response = router(failing()).oneshot(request).await.unwrap();

            assert_eq!(
                response.status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{uri}"
            );
            let body = body_json(response).await;
            assert_eq!(body["message"], "An unexpected error occurred.", "{uri}");
            assert!(!body.to_string().contains("store offline"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_id_query_is_bad_request() {
        let repo = MockProductRepository::new();

        let response = router(repo)
            .oneshot(empty_request("GET", "/get?id=abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
