use crate::{
    auth::{authorize, AuthenticatedUser},
    error::ApiResult,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use hub_service::{
    CreateProjectRequest, CreateTaskRequest, PageRequest, Permission, Project, ProjectWithCreator,
    Task, TaskAnalytics, UpdateProjectRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/workspaces/{id}/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/api/v1/workspaces/{id}/projects/{project_id}",
            get(get_project).put(update_project),
        )
        .route(
            "/api/v1/workspaces/{id}/projects/{project_id}/analytics",
            get(project_analytics),
        )
        .route(
            "/api/v1/workspaces/{id}/projects/{project_id}/tasks",
            post(create_task),
        )
}

/// Raw query values; anything that is not a number falls back to the default.
///
/// `pageSize` and `pageNumber` are accepted as well. When a key is repeated,
/// or given in both spellings, the first occurrence wins.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectsQuery {
    page_size: Option<String>,
    page_number: Option<String>,
}

impl ProjectsQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page_size" | "pageSize" => &mut query.page_size,
                "page_number" | "pageNumber" => &mut query.page_number,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn page_request(&self, max_page_size: i64) -> PageRequest {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
        PageRequest::clamped(parse(&self.page_size), parse(&self.page_number), max_page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginationInfo {
    pub total_count: i64,
    pub page_size: i64,
    pub page_number: i64,
    pub total_pages: i64,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectWithCreator>,
    pub pagination: PaginationInfo,
}

#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/projects",
    params(("id" = String, Path, description = "Workspace ID")),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 401, description = "Not a member or missing permission")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    authorize(&state, &user, &workspace_id, &[Permission::CreateProject]).await?;

    let project = state
        .projects
        .create_project(&user.user_id, &workspace_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/projects",
    params(("id" = String, Path, description = "Workspace ID"), ProjectsQuery),
    responses(
        (status = 200, description = "One page of projects, newest first", body = ProjectListResponse),
        (status = 401, description = "Not a member or missing permission")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<ProjectListResponse>> {
    authorize(&state, &user, &workspace_id, &[Permission::ViewOnly]).await?;

    let page = ProjectsQuery::from_pairs(pairs).page_request(state.max_page_size);
    let result = state.projects.list_projects(&workspace_id, page).await?;

    Ok(Json(ProjectListResponse {
        projects: result.items,
        pagination: PaginationInfo {
            total_count: result.total_count,
            page_size: page.page_size(),
            page_number: page.page_number(),
            total_pages: result.total_pages,
            skip: result.skip,
            limit: page.page_size(),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/projects/{project_id}",
    params(
        ("id" = String, Path, description = "Workspace ID"),
        ("project_id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found in this workspace")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<Project>> {
    authorize(&state, &user, &workspace_id, &[Permission::ViewOnly]).await?;

    let project = state.projects.get_project(&workspace_id, &project_id).await?;
    Ok(Json(project))
}

#[utoipa::path(
    put,
    path = "/api/v1/workspaces/{id}/projects/{project_id}",
    params(
        ("id" = String, Path, description = "Workspace ID"),
        ("project_id" = String, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 401, description = "Not a member or missing permission"),
        (status = 404, description = "Project not found in this workspace")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    authorize(&state, &user, &workspace_id, &[Permission::EditProject]).await?;

    let project = state
        .projects
        .update_project(&workspace_id, &project_id, req)
        .await?;
    Ok(Json(project))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/projects/{project_id}/analytics",
    params(
        ("id" = String, Path, description = "Workspace ID"),
        ("project_id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Task counts for the project", body = TaskAnalytics),
        (status = 404, description = "Project not found in this workspace")
    )
)]
pub async fn project_analytics(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> ApiResult<Json<TaskAnalytics>> {
    authorize(&state, &user, &workspace_id, &[Permission::ViewOnly]).await?;

    let analytics = state
        .projects
        .project_analytics(&workspace_id, &project_id)
        .await?;
    Ok(Json(analytics))
}

#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/projects/{project_id}/tasks",
    params(
        ("id" = String, Path, description = "Workspace ID"),
        ("project_id" = String, Path, description = "Project ID")
    ),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 401, description = "Not a member or missing permission"),
        (status = 404, description = "Project not found in this workspace")
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    authorize(&state, &user, &workspace_id, &[Permission::CreateTask]).await?;

    let task = state
        .tasks
        .create_task(&user.user_id, &workspace_id, &project_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}
