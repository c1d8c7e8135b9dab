use crate::db::{from_millis, new_id, serialize_datetime, to_millis};
use crate::error::{Result, ServiceError};
use crate::permission::{Permission, PermissionTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<Permission>,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Clone)]
pub struct RoleService {
    pool: SqlitePool,
}

impl RoleService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert every role of `table` that is not stored yet.
    ///
    /// Existing roles are left untouched, so running this twice is harmless.
    #[instrument(skip_all)]
    pub async fn seed_roles(&self, table: &PermissionTable) -> Result<SeedReport> {
        let mut report = SeedReport::default();
        let mut tx = self.pool.begin().await?;

        for (name, permissions) in table.roles() {
            let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM roles WHERE name = ?")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;

            if exists.is_some() {
                info!("Role '{}' already exists, skipping", name);
                report.skipped.push(name.to_string());
                continue;
            }

            let permissions: Vec<Permission> = permissions.iter().copied().collect();
            sqlx::query("INSERT INTO roles (id, name, permissions, created_at) VALUES (?, ?, ?, ?)")
                .bind(new_id())
                .bind(name)
                .bind(serde_json::to_string(&permissions)?)
                .bind(to_millis(Utc::now()))
                .execute(&mut *tx)
                .await?;

            info!("Role '{}' added", name);
            report.added.push(name.to_string());
        }

        tx.commit().await?;
        Ok(report)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT * FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Role::try_from).transpose()
    }

    pub async fn get_role(&self, id: &str) -> Result<Role> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT * FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role"))?;

        Role::try_from(row)
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleSummary>> {
        let roles = sqlx::query_as::<_, RoleSummary>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: String,
    name: String,
    permissions: String,
    created_at: i64,
}

impl TryFrom<RoleRow> for Role {
    type Error = ServiceError;

    fn try_from(row: RoleRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            permissions: serde_json::from_str(&row.permissions)?,
            created_at: from_millis(row.created_at),
        })
    }
}
