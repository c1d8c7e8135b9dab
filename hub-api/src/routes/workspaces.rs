use crate::{
    auth::{authorize, AuthenticatedUser},
    error::ApiResult,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use hub_service::{
    CreateWorkspaceRequest, Member, Permission, TaskAnalytics, UpdateWorkspaceRequest, Workspace,
    WorkspaceMembers, WorkspaceWithMembers,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/workspaces",
            get(list_workspaces).post(create_workspace),
        )
        .route(
            "/api/v1/workspaces/{id}",
            get(get_workspace).put(update_workspace),
        )
        .route("/api/v1/workspaces/{id}/members", get(list_members))
        .route("/api/v1/workspaces/{id}/members/role", put(change_member_role))
        .route("/api/v1/workspaces/{id}/analytics", get(workspace_analytics))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeMemberRoleRequest {
    #[serde(alias = "memberId")]
    pub member_id: String,
    #[serde(alias = "roleId")]
    pub role_id: String,
}

/// Create a workspace owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/workspaces",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = Workspace),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User or owner role not found")
    )
)]
pub async fn create_workspace(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let workspace = state
        .workspaces
        .create_workspace(&user.user_id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(workspace)))
}

/// Workspaces the caller is a member of
#[utoipa::path(
    get,
    path = "/api/v1/workspaces",
    responses((status = 200, description = "Workspaces", body = Vec<Workspace>))
)]
pub async fn list_workspaces(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<Workspace>>> {
    let workspaces = state
        .workspaces
        .list_workspaces_for_member(&user.user_id)
        .await?;

    Ok(Json(workspaces))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}",
    params(("id" = String, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace with its members", body = WorkspaceWithMembers),
        (status = 401, description = "Not a member or missing permission"),
        (status = 404, description = "Workspace not found")
    )
)]
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<WorkspaceWithMembers>> {
    authorize(&state, &user, &id, &[Permission::ViewOnly]).await?;

    let workspace = state.workspaces.get_workspace_with_members(&id).await?;
    Ok(Json(workspace))
}

#[utoipa::path(
    put,
    path = "/api/v1/workspaces/{id}",
    params(("id" = String, Path, description = "Workspace ID")),
    request_body = UpdateWorkspaceRequest,
    responses(
        (status = 200, description = "Updated workspace", body = Workspace),
        (status = 401, description = "Not a member or missing permission"),
        (status = 404, description = "Workspace not found")
    )
)]
pub async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    authorize(&state, &user, &id, &[Permission::EditWorkspace]).await?;

    let workspace = state.workspaces.update_workspace(&id, req).await?;
    Ok(Json(workspace))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/members",
    params(("id" = String, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Members and assignable roles", body = WorkspaceMembers),
        (status = 401, description = "Not a member or missing permission")
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<WorkspaceMembers>> {
    authorize(&state, &user, &id, &[Permission::ViewOnly]).await?;

    let members = state.workspaces.workspace_members(&id).await?;
    Ok(Json(members))
}

#[utoipa::path(
    put,
    path = "/api/v1/workspaces/{id}/members/role",
    params(("id" = String, Path, description = "Workspace ID")),
    request_body = ChangeMemberRoleRequest,
    responses(
        (status = 200, description = "Updated membership", body = Member),
        (status = 401, description = "Not a member or missing permission"),
        (status = 404, description = "Workspace, role or membership not found")
    )
)]
pub async fn change_member_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<ChangeMemberRoleRequest>,
) -> ApiResult<Json<Member>> {
    authorize(&state, &user, &id, &[Permission::ChangeMemberRole]).await?;

    let member = state
        .members
        .change_member_role(&id, &req.member_id, &req.role_id)
        .await?;
    Ok(Json(member))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/analytics",
    params(("id" = String, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Task counts", body = TaskAnalytics),
        (status = 401, description = "Not a member or missing permission")
    )
)]
pub async fn workspace_analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<TaskAnalytics>> {
    authorize(&state, &user, &id, &[Permission::ViewOnly]).await?;

    let analytics = state.workspaces.workspace_analytics(&id).await?;
    Ok(Json(analytics))
}
