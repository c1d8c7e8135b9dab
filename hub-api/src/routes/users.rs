use crate::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use axum::{extract::State, routing::get, Json, Router};
use hub_service::User;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/user/current", get(current_user))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/user/current",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing identity header"),
        (status = 404, description = "User not found")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<User>> {
    let user = state.users.current_user(&user.user_id).await?;
    Ok(Json(user))
}
