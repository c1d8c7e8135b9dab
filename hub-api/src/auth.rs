use crate::{error::ApiError, state::AppState};
use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use hub_service::Permission;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Auth middleware - extracts the caller's user id set by the upstream
/// identity provider.
///
/// Sessions and credentials are handled in front of this service; it only
/// trusts the `x-hub-user` header (or `x-forwarded-user` from oauth2-proxy,
/// or `x-user` for local development).
pub async fn auth_middleware(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let user_id = req
        .headers()
        .get("x-hub-user")
        .or_else(|| req.headers().get("x-forwarded-user"))
        .or_else(|| req.headers().get("x-user"))
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

/// Resolve the caller's role in `workspace_id` and run it through the
/// permission gate. Returns the role name on success.
pub async fn authorize(
    state: &AppState,
    user: &AuthenticatedUser,
    workspace_id: &str,
    required: &[Permission],
) -> Result<String, ApiError> {
    let role = state
        .members
        .member_role_in_workspace(&user.user_id, workspace_id)
        .await?;

    state.permissions.check(&role, required)?;

    Ok(role)
}
