use crate::db::{from_millis, new_id, serialize_datetime, serialize_optional_datetime, to_millis};
use crate::error::{Result, ServiceError};
use crate::validate::{self, MAX_DESCRIPTION_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(serialize_with = "serialize_optional_datetime")]
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    pub project_id: String,
    pub workspace_id: String,
    pub created_by: String,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    #[default]
    Todo,
    InProgress,
    InReview,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskAnalytics {
    pub total_tasks: i64,
    pub overdue_tasks: i64,
    pub completed_tasks: i64,
}

const ANALYTICS_SELECT: &str = "SELECT COUNT(*),
        COALESCE(SUM(CASE WHEN due_date IS NOT NULL AND due_date < ? AND status != ? THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
     FROM tasks";

#[derive(Clone)]
pub struct TaskService {
    pool: SqlitePool,
}

impl TaskService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a task in `project_id`, which must belong to `workspace_id`.
    #[instrument(skip(self, req))]
    pub async fn create_task(
        &self,
        user_id: &str,
        workspace_id: &str,
        project_id: &str,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        let title = validate::name("title", &req.title)?;
        let description =
            validate::optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        let project: Option<(String,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = ? AND workspace_id = ?")
                .bind(project_id)
                .bind(workspace_id)
                .fetch_optional(&self.pool)
                .await?;
        if project.is_none() {
            return Err(ServiceError::NotFound(
                "Project not found or does not belong to the specified workspace".to_string(),
            ));
        }

        let id = new_id();
        let now = to_millis(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, due_date, project_id, workspace_id, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(&description)
        .bind(req.status.unwrap_or_default())
        .bind(req.due_date.map(to_millis))
        .bind(project_id)
        .bind(workspace_id)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_task(&id).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task"))?;

        Ok(row.into())
    }

    /// Total, overdue (past due and not done) and completed tasks in a workspace.
    pub async fn analytics_for_workspace(&self, workspace_id: &str) -> Result<TaskAnalytics> {
        let (total_tasks, overdue_tasks, completed_tasks): (i64, i64, i64) =
            sqlx::query_as(&format!("{ANALYTICS_SELECT} WHERE workspace_id = ?"))
                .bind(to_millis(Utc::now()))
                .bind(TaskStatus::Done)
                .bind(TaskStatus::Done)
                .bind(workspace_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(TaskAnalytics {
            total_tasks,
            overdue_tasks,
            completed_tasks,
        })
    }

    pub async fn analytics_for_project(&self, project_id: &str) -> Result<TaskAnalytics> {
        let (total_tasks, overdue_tasks, completed_tasks): (i64, i64, i64) =
            sqlx::query_as(&format!("{ANALYTICS_SELECT} WHERE project_id = ?"))
                .bind(to_millis(Utc::now()))
                .bind(TaskStatus::Done)
                .bind(TaskStatus::Done)
                .bind(project_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(TaskAnalytics {
            total_tasks,
            overdue_tasks,
            completed_tasks,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date: Option<i64>,
    project_id: String,
    workspace_id: String,
    created_by: String,
    created_at: i64,
    updated_at: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            due_date: row.due_date.map(from_millis),
            project_id: row.project_id,
            workspace_id: row.workspace_id,
            created_by: row.created_by,
            created_at: from_millis(row.created_at),
            updated_at: from_millis(row.updated_at),
        }
    }
}
