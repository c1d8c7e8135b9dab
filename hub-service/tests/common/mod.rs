//! Shared fixtures for hub-service integration tests.

#![allow(dead_code)]

use hub_service::{
    CreateProjectRequest, CreateUserRequest, CreateWorkspaceRequest, PermissionTable, Project,
    ProjectService, RoleService, User, UserService, Workspace, WorkspaceService,
};
use sqlx::SqlitePool;

/// In-memory database with migrations applied but no roles seeded.
pub async fn create_empty_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// In-memory database with the standard roles seeded.
pub async fn create_test_db() -> SqlitePool {
    let pool = create_empty_db().await;

    RoleService::new(pool.clone())
        .seed_roles(&PermissionTable::standard())
        .await
        .expect("Failed to seed roles");

    pool
}

pub async fn fixture_user(pool: &SqlitePool, name: &str) -> User {
    UserService::new(pool.clone())
        .create_user(CreateUserRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            profile_picture: Some(format!("https://cdn.example.com/{}.png", name)),
            password_hash: Some("$argon2id$not-a-real-hash".to_string()),
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

/// Add `user` to `workspace` with the role called `role_name`.
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

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    n
}
