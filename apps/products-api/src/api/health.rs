//! Readiness endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::postgres::check_health;
use serde_json::json;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let Some(db) = state.db.as_ref() else {
        return (StatusCode::OK, Json(json!({"status": "ready", "storage": "memory"})));
    };

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async move { check_health(db).await.map_err(|e| e.to_string()) }),
    )];

    match run_health_checks(checks).await {
        Ok(ok) => ok,
        Err(not_ready) => not_ready,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, StorageBackend};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ready_without_database_is_ready() {
        let state = AppState {
            config: Config {
                app: app_info!(),
                server: ServerConfig::default(),
                environment: Environment::Development,
                storage: StorageBackend::Memory,
                postgres: None,
                run_migrations: false,
            },
            db: None,
        };

        let response = router(state)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ready");
    }
}
