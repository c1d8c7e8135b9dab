use crate::db::{from_millis, new_id, serialize_datetime, to_millis};
use crate::error::{Result, ServiceError};
use crate::validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::instrument;
use utoipa::ToSchema;

/// A user as exposed to callers. The credential hash never leaves storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub current_workspace: Option<String>,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
    /// Already-hashed credential; hashing belongs to the auth layer.
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        let name = validate::name("name", &req.name)?;
        let email = req.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(ServiceError::InvalidInput(format!(
                "invalid email address: {}",
                req.email
            )));
        }

        let id = new_id();
        let now = to_millis(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, profile_picture, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&email)
        .bind(&req.profile_picture)
        .bind(&req.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                ServiceError::InvalidInput(format!("email already registered: {}", email))
            } else {
                ServiceError::Database(e)
            }
        })?;

        self.get_user(&id).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, profile_picture, current_workspace, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))?;

        Ok(row.into())
    }

    /// Profile of the authenticated caller.
    pub async fn current_user(&self, id: &str) -> Result<User> {
        self.get_user(id).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    profile_picture: Option<String>,
    current_workspace: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            profile_picture: row.profile_picture,
            current_workspace: row.current_workspace,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}
