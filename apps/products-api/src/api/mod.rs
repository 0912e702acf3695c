//! API routes module

pub mod health;

use axum::Router;
use domain_products::{handlers, InMemoryProductRepository, PgProductRepository};

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let products = match &state.db {
        Some(db) => handlers::router(PgProductRepository::new(db.clone())),
        None => handlers::router(InMemoryProductRepository::new()),
    };

    Router::new().nest("/v1/product", products)
}
