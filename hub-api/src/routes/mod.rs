pub mod health;
pub mod projects;
pub mod users;
pub mod workspaces;

use crate::{api_docs::ApiDoc, auth::auth_middleware, state::AppState};
use axum::{middleware, routing::get, Json, Router};
use hub_service::PermissionTable;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub async fn create_app(
    pool: SqlitePool,
    permissions: Arc<PermissionTable>,
    max_page_size: i64,
) -> anyhow::Result<Router> {
    let state = AppState::new(pool, permissions, max_page_size);

    // Frontend is served from a different origin during development
    let cors = CorsLayer::permissive();

    let app = Router::new()
        .merge(health::routes())
        .route("/api-docs/openapi.json", get(openapi_spec))
        .merge(
            workspaces::routes()
                .merge(projects::routes())
                .merge(users::routes())
                .layer(middleware::from_fn(auth_middleware)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
