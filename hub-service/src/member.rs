use crate::db::{from_millis, serialize_datetime};
use crate::error::{Result, ServiceError};
use crate::role::RoleSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Binding of one user to one workspace with one role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub id: String,
    pub user_id: String,
    pub workspace_id: String,
    pub role: RoleSummary,

    #[serde(serialize_with = "serialize_datetime")]
    pub joined_at: DateTime<Utc>,
}

/// Partial user profile attached to a membership listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberWithUser {
    #[serde(flatten)]
    pub member: Member,
    pub user: MemberProfile,
}

const MEMBER_COLUMNS: &str = "m.id, m.user_id, m.workspace_id, m.role_id, r.name AS role_name, m.joined_at";

#[derive(Clone)]
pub struct MemberService {
    pool: SqlitePool,
}

impl MemberService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Name of the role `user_id` holds in `workspace_id`.
    ///
    /// Callers that are not members are rejected as unauthorized.
    pub async fn member_role_in_workspace(&self, user_id: &str, workspace_id: &str) -> Result<String> {
        self.ensure_workspace(workspace_id).await?;

        let member = self
            .find_member(user_id, workspace_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("You are not a member of this workspace".to_string())
            })?;

        Ok(member.role.name)
    }

    pub async fn find_member(&self, user_id: &str, workspace_id: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members m JOIN roles r ON r.id = m.role_id
             WHERE m.user_id = ? AND m.workspace_id = ?"
        ))
        .bind(user_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    pub async fn list_members(&self, workspace_id: &str) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members m JOIN roles r ON r.id = m.role_id
             WHERE m.workspace_id = ? ORDER BY m.joined_at, m.rowid"
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Members with their partial user profile. The credential hash is never selected.
    pub async fn list_members_with_users(&self, workspace_id: &str) -> Result<Vec<MemberWithUser>> {
        let rows = sqlx::query_as::<_, MemberUserRow>(&format!(
            "SELECT {MEMBER_COLUMNS}, u.name AS user_name, u.email AS user_email,
                    u.profile_picture AS user_profile_picture
             FROM members m
             JOIN roles r ON r.id = m.role_id
             JOIN users u ON u.id = m.user_id
             WHERE m.workspace_id = ? ORDER BY m.joined_at, m.rowid"
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MemberWithUser::from).collect())
    }

    /// Point the membership of `member_user_id` in `workspace_id` at `role_id`.
    ///
    /// Re-applying the current role succeeds and changes nothing.
    #[instrument(skip(self))]
    pub async fn change_member_role(
        &self,
        workspace_id: &str,
        member_user_id: &str,
        role_id: &str,
    ) -> Result<Member> {
        self.ensure_workspace(workspace_id).await?;

        let role: Option<(String,)> = sqlx::query_as("SELECT id FROM roles WHERE id = ?")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?;
        if role.is_none() {
            return Err(ServiceError::not_found("Role"));
        }

        let member = self
            .find_member(member_user_id, workspace_id)
            .await?
            .ok_or(ServiceError::MemberNotFound)?;

        sqlx::query("UPDATE members SET role_id = ? WHERE id = ?")
            .bind(role_id)
            .bind(&member.id)
            .execute(&self.pool)
            .await?;

        info!(member_id = %member.id, "member role updated");

        self.find_member(member_user_id, workspace_id)
            .await?
            .ok_or(ServiceError::MemberNotFound)
    }

    async fn ensure_workspace(&self, workspace_id: &str) -> Result<()> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM workspaces WHERE id = ?")
            .bind(workspace_id)
            .fetch_optional(&self.pool)
            .await?;

        found
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Workspace"))
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    user_id: String,
    workspace_id: String,
    role_id: String,
    role_name: String,
    joined_at: i64,
}

#[derive(sqlx::FromRow)]
struct MemberUserRow {
    #[sqlx(flatten)]
    member: MemberRow,
    user_name: String,
    user_email: String,
    user_profile_picture: Option<String>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            workspace_id: row.workspace_id,
            role: RoleSummary {
                id: row.role_id,
                name: row.role_name,
            },
            joined_at: from_millis(row.joined_at),
        }
    }
}

impl From<MemberUserRow> for MemberWithUser {
    fn from(row: MemberUserRow) -> Self {
        let member = Member::from(row.member);
        let user = MemberProfile {
            id: member.user_id.clone(),
            name: row.user_name,
            email: row.user_email,
            profile_picture: row.user_profile_picture,
        };
        Self { member, user }
    }
}
