use hub_service::{
    MemberService, PermissionTable, ProjectService, TaskService, UserService, WorkspaceService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub permissions: Arc<PermissionTable>,
    pub max_page_size: i64,
    pub users: UserService,
    pub workspaces: WorkspaceService,
    pub members: MemberService,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(pool: SqlitePool, permissions: Arc<PermissionTable>, max_page_size: i64) -> Self {
        Self {
            permissions,
            max_page_size,
            users: UserService::new(pool.clone()),
            workspaces: WorkspaceService::new(pool.clone()),
            members: MemberService::new(pool.clone()),
            projects: ProjectService::new(pool.clone()),
            tasks: TaskService::new(pool),
        }
    }
}
