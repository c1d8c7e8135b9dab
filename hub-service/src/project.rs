use crate::db::{from_millis, new_id, serialize_datetime, to_millis};
use crate::error::{Result, ServiceError};
use crate::pagination::{total_pages, Page, PageRequest};
use crate::task::{TaskAnalytics, TaskService};
use crate::validate::{self, MAX_DESCRIPTION_LEN, MAX_EMOJI_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, instrument};
use utoipa::ToSchema;

pub const DEFAULT_EMOJI: &str = "📊";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub emoji: String,
    pub workspace_id: String,
    pub created_by: String,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Public slice of the project creator's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatorProfile {
    pub id: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectWithCreator {
    #[serde(flatten)]
    pub project: Project,
    pub creator: CreatorProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

/// Blank or missing fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub emoji: Option<String>,
}

const NOT_IN_WORKSPACE: &str = "Project not found or does not belong to the specified workspace";

#[derive(Clone)]
pub struct ProjectService {
    pool: SqlitePool,
}

impl ProjectService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, req))]
    pub async fn create_project(
        &self,
        user_id: &str,
        workspace_id: &str,
        req: CreateProjectRequest,
    ) -> Result<Project> {
        let name = validate::name("name", &req.name)?;
        let description =
            validate::optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        let emoji = validate::optional_text("emoji", req.emoji.as_deref(), MAX_EMOJI_LEN)?
            .unwrap_or_else(|| DEFAULT_EMOJI.to_string());

        let id = new_id();
        let now = to_millis(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, emoji, workspace_id, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&description)
        .bind(&emoji)
        .bind(workspace_id)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_project(workspace_id, &id).await
    }

    /// One page of a workspace's projects, newest first, each with its
    /// creator's public profile.
    #[instrument(skip(self))]
    pub async fn list_projects(
        &self,
        workspace_id: &str,
        page: PageRequest,
    ) -> Result<Page<ProjectWithCreator>> {
        let (total_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE workspace_id = ?")
                .bind(workspace_id)
                .fetch_one(&self.pool)
                .await?;

        let skip = page.skip();
        let rows = sqlx::query_as::<_, ProjectCreatorRow>(
            "SELECT p.*, u.name AS creator_name, u.profile_picture AS creator_profile_picture
             FROM projects p
             JOIN users u ON u.id = p.created_by
             WHERE p.workspace_id = ?
             ORDER BY p.created_at DESC, p.rowid DESC
             LIMIT ? OFFSET ?",
        )
        .bind(workspace_id)
        .bind(page.page_size())
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        debug!(total_count, returned = rows.len(), "listed projects");

        Ok(Page {
            items: rows.into_iter().map(ProjectWithCreator::from).collect(),
            total_count,
            total_pages: total_pages(total_count, page.page_size()),
            skip,
        })
    }

    /// A project, provided it belongs to `workspace_id`.
    pub async fn get_project(&self, workspace_id: &str, project_id: &str) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects WHERE id = ? AND workspace_id = ?",
        )
        .bind(project_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(NOT_IN_WORKSPACE.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self, req))]
    pub async fn update_project(
        &self,
        workspace_id: &str,
        project_id: &str,
        req: UpdateProjectRequest,
    ) -> Result<Project> {
        let current = self.get_project(workspace_id, project_id).await?;

        let name = match req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => validate::name("name", name)?.to_string(),
            None => current.name,
        };
        let description =
            validate::optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?
                .or(current.description);
        let emoji = validate::optional_text("emoji", req.emoji.as_deref(), MAX_EMOJI_LEN)?
            .unwrap_or(current.emoji);

        sqlx::query(
            "UPDATE projects SET name = ?, description = ?, emoji = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(&description)
        .bind(&emoji)
        .bind(to_millis(Utc::now()))
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        self.get_project(workspace_id, project_id).await
    }

    pub async fn project_analytics(&self, workspace_id: &str, project_id: &str) -> Result<TaskAnalytics> {
        self.get_project(workspace_id, project_id).await?;
        TaskService::new(self.pool.clone())
            .analytics_for_project(project_id)
            .await
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    name: String,
    description: Option<String>,
    emoji: String,
    workspace_id: String,
    created_by: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(sqlx::FromRow)]
struct ProjectCreatorRow {
    #[sqlx(flatten)]
    project: ProjectRow,
    creator_name: String,
    creator_profile_picture: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            emoji: row.emoji,
            workspace_id: row.workspace_id,
            created_by: row.created_by,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}

impl From<ProjectCreatorRow> for ProjectWithCreator {
    fn from(row: ProjectCreatorRow) -> Self {
        let project = Project::from(row.project);
        let creator = CreatorProfile {
            id: project.created_by.clone(),
            name: row.creator_name,
            profile_picture: row.creator_profile_picture,
        };
        Self { project, creator }
    }
}
