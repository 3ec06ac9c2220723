use axum::http::{HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::request_tracing_middleware,
    modules::{
        accounts::routes::accounts_routes, assignments::routes::assignments_routes,
        auth::routes::auth_routes, catalog::routes::catalog_routes,
        results::routes::results_routes, submissions::routes::submissions_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.env.app.cors_origins);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(accounts_routes())
        .merge(catalog_routes())
        .merge(assignments_routes())
        .merge(submissions_routes())
        .merge(results_routes())
        .layer(cors)
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    layer.allow_origin(parsed)
}

async fn hello(axum::extract::State(state): axum::extract::State<AppState>) -> String {
    format!("{} says hello!\n", state.env.app.name)
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
