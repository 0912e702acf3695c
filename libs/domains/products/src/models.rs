use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Product record
///
/// An `id` of `0` (or an omitted `id`) means "not yet assigned"; the store
/// picks one on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(default)]
    #[schema(example = 85)]
    pub id: i64,
    #[schema(example = "Produto Teste")]
    pub name: String,
    #[schema(example = "Teste")]
    pub description: String,
    /// Free-form quantity, negative values allowed
    #[schema(example = 50)]
    pub mount: i32,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        mount: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            mount,
        }
    }

    /// Whether the store still has to assign an id
    pub fn is_unassigned(&self) -> bool {
        self.id == 0
    }
}

/// `?id=` query parameter used by the remove and get routes
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductIdQuery {
    /// Product ID
    pub id: i64,
}

/// Plain confirmation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
