//! Common test utilities and helpers for hub-api tests

#![allow(dead_code)]

use axum::Router;
use hub_service::{
    CreateProjectRequest, CreateUserRequest, CreateWorkspaceRequest, PermissionTable, Project,
    ProjectService, RoleService, User, UserService, Workspace, WorkspaceService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// In-memory database with migrations applied and the standard roles seeded
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("../hub-service/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    RoleService::new(pool.clone())
        .seed_roles(&PermissionTable::standard())
        .await
        .expect("Failed to seed roles");

    pool
}

pub async fn create_test_app(pool: SqlitePool) -> Router {
    hub_api::create_app(pool, Arc::new(PermissionTable::standard()), 100)
        .await
        .expect("Failed to create test app")
}

pub async fn fixture_user(pool: &SqlitePool, name: &str) -> User {
    UserService::new(pool.clone())
        .create_user(CreateUserRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            profile_picture: Some(format!("https://cdn.example.com/{}.png", name)),
            password_hash: None,
        })
        .await
        .expect("Failed to create fixture user")
}

pub async fn fixture_workspace(pool: &SqlitePool, owner: &User, name: &str) -> Workspace {
    WorkspaceService::new(pool.clone())
        .create_workspace(
            &owner.id,
            CreateWorkspaceRequest {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create fixture workspace")
}

pub async fn fixture_project(
    pool: &SqlitePool,
    creator: &User,
    workspace: &Workspace,
    name: &str,
) -> Project {
    ProjectService::new(pool.clone())
        .create_project(
            &creator.id,
            &workspace.id,
            CreateProjectRequest {
                name: name.to_string(),
                description: None,
                emoji: None,
            },
        )
        .await
        .expect("Failed to create fixture project")
}

/// Add `user` to `workspace` with the role called `role_name`
pub async fn add_member(pool: &SqlitePool, workspace: &Workspace, user: &User, role_name: &str) {
    let role = RoleService::new(pool.clone())
        .find_by_name(role_name)
        .await
        .expect("Failed to look up role")
        .expect("Role not seeded");

    sqlx::query(
        "INSERT INTO members (id, user_id, workspace_id, role_id, joined_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(format!("member-{}-{}", user.id, workspace.id))
    .bind(&user.id)
    .bind(&workspace.id)
    .bind(&role.id)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(pool)
    .await
    .expect("Failed to insert member");
}

pub async fn role_id(pool: &SqlitePool, role_name: &str) -> String {
    RoleService::new(pool.clone())
        .find_by_name(role_name)
        .await
        .expect("Failed to look up role")
        .expect("Role not seeded")
        .id
}

/// Helper to extract JSON body from axum response
pub async fn extract_json_body<T>(response: axum::response::Response) -> T
where
    T: serde::de::DeserializeOwned,
{
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    serde_json::from_slice(&body).expect("Failed to deserialize JSON")
}

pub fn auth_headers(user_id: &str) -> Vec<(&'static str, &str)> {
    vec![("x-user", user_id)]
}

/// TestClient to encapsulate API interaction logic
pub struct TestClient {
    pub app: Router,
}

impl TestClient {
    pub async fn new(pool: SqlitePool) -> Self {
        let app = create_test_app(pool).await;
        Self { app }
    }

    pub async fn send_request(
        &self,
        request: axum::http::Request<axum::body::Body>,
    ) -> axum::http::Response<axum::body::Body> {
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        method: &str,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        let req_body = serde_json::to_string(body).expect("Failed to serialize request body");
        let mut builder = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");

        if let Some(h) = headers {
            for (k, v) in h {
                builder = builder.header(k, v);
            }
        }

        let request = builder.body(axum::body::Body::from(req_body)).unwrap();
        self.send_request(request).await
    }

    pub async fn post<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_json("POST", uri, body, headers).await
    }

    pub async fn put<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        self.send_json("PUT", uri, body, headers).await
    }

    pub async fn get(
        &self,
        uri: &str,
        headers: Option<Vec<(&str, &str)>>,
    ) -> axum::http::Response<axum::body::Body> {
        let mut builder = axum::http::Request::builder().method("GET").uri(uri);

        if let Some(h) = headers {
            for (k, v) in h {
                builder = builder.header(k, v);
            }
        }

        let request = builder.body(axum::body::Body::empty()).unwrap();
        self.send_request(request).await
    }
}

pub async fn count_workspaces(pool: &SqlitePool) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workspaces")
        .fetch_one(pool)
        .await
        .expect("Failed to count workspaces");
    n
}
