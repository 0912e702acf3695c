use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// JSON body extractor that rejects with [`AppError`].
///
/// Same status codes as `axum::Json` (400, 415, 422) but with the JSON error
/// body used everywhere else.
///
/// # Example
/// ```ignore
/// async fn add(JsonBody(product): JsonBody<Product>) -> impl IntoResponse {
///     Json(product)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(data))
    }
}
