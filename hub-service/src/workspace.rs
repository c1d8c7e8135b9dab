use crate::db::{from_millis, new_id, serialize_datetime, to_millis};
use crate::error::{Result, ServiceError};
use crate::member::{Member, MemberService, MemberWithUser};
use crate::permission::StandardRole;
use crate::role::{RoleService, RoleSummary};
use crate::task::{TaskAnalytics, TaskService};
use crate::validate::{self, MAX_DESCRIPTION_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Blank or missing fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceWithMembers {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceMembers {
    pub members: Vec<MemberWithUser>,
    pub roles: Vec<RoleSummary>,
}

#[derive(Clone)]
pub struct WorkspaceService {
    pool: SqlitePool,
}

impl WorkspaceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a workspace owned by `owner_id`.
    ///
    /// The workspace row, the owner's OWNER membership and the owner's
    /// current-workspace pointer are written in one transaction: either all
    /// three land or none do.
    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_workspace(&self, owner_id: &str, req: CreateWorkspaceRequest) -> Result<Workspace> {
        let name = validate::name("name", &req.name)?;
        let description =
            validate::optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        let user: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        if user.is_none() {
            return Err(ServiceError::not_found("User"));
        }

        let owner_role = RoleService::new(self.pool.clone())
            .find_by_name(StandardRole::Owner.as_str())
            .await?
            .ok_or_else(|| ServiceError::not_found("Owner role"))?;

        let id = new_id();
        let now = to_millis(Utc::now());
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO workspaces (id, name, description, owner, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(&description)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO members (id, user_id, workspace_id, role_id, joined_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_id())
        .bind(owner_id)
        .bind(&id)
        .bind(&owner_role.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET current_workspace = ?, updated_at = ? WHERE id = ?")
            .bind(&id)
            .bind(now)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(workspace_id = %id, owner = owner_id, "workspace created");

        self.get_workspace(&id).await
    }

    /// Get a single workspace by ID
    pub async fn get_workspace(&self, id: &str) -> Result<Workspace> {
        let row = sqlx::query_as::<_, WorkspaceRow>("SELECT * FROM workspaces WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Workspace"))?;

        Ok(row.into())
    }

    /// Every workspace `user_id` holds a membership in, newest first.
    pub async fn list_workspaces_for_member(&self, user_id: &str) -> Result<Vec<Workspace>> {
        let rows = sqlx::query_as::<_, WorkspaceRow>(
            "SELECT w.* FROM workspaces w
             JOIN members m ON m.workspace_id = w.id
             WHERE m.user_id = ?
             ORDER BY w.created_at DESC, w.rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    pub async fn get_workspace_with_members(&self, id: &str) -> Result<WorkspaceWithMembers> {
        let workspace = self.get_workspace(id).await?;
        let members = MemberService::new(self.pool.clone()).list_members(id).await?;

        Ok(WorkspaceWithMembers { workspace, members })
    }

    pub async fn workspace_members(&self, id: &str) -> Result<WorkspaceMembers> {
        self.get_workspace(id).await?;

        let members = MemberService::new(self.pool.clone())
            .list_members_with_users(id)
            .await?;
        let roles = RoleService::new(self.pool.clone()).list_roles().await?;

        Ok(WorkspaceMembers { members, roles })
    }

    pub async fn workspace_analytics(&self, id: &str) -> Result<TaskAnalytics> {
        self.get_workspace(id).await?;
        TaskService::new(self.pool.clone())
            .analytics_for_workspace(id)
            .await
    }

    #[instrument(skip(self, req))]
    pub async fn update_workspace(&self, id: &str, req: UpdateWorkspaceRequest) -> Result<Workspace> {
        let current = self.get_workspace(id).await?;

        let name = match req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => validate::name("name", name)?.to_string(),
            None => current.name,
        };
        let description =
            validate::optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?
                .or(current.description);

        sqlx::query("UPDATE workspaces SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(&description)
            .bind(to_millis(Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_workspace(id).await
    }
}

#[derive(sqlx::FromRow)]
struct WorkspaceRow {
    id: String,
    name: String,
    description: Option<String>,
    owner: String,
    created_at: i64,
    updated_at: i64,
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: row.owner,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}
