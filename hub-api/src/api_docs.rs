use crate::routes::{
    projects::{PaginationInfo, ProjectListResponse},
    workspaces::ChangeMemberRoleRequest,
};
use hub_service::{
    CreateProjectRequest, CreateTaskRequest, CreateWorkspaceRequest, CreatorProfile, Member,
    MemberProfile, MemberWithUser, Permission, Project, ProjectWithCreator, RoleSummary, Task,
    TaskAnalytics, TaskStatus, UpdateProjectRequest, UpdateWorkspaceRequest, User, Workspace,
    WorkspaceMembers, WorkspaceWithMembers,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::users::current_user,
        crate::routes::workspaces::list_workspaces,
        crate::routes::workspaces::create_workspace,
        crate::routes::workspaces::get_workspace,
        crate::routes::workspaces::update_workspace,
        crate::routes::workspaces::list_members,
        crate::routes::workspaces::change_member_role,
        crate::routes::workspaces::workspace_analytics,
        crate::routes::projects::list_projects,
        crate::routes::projects::create_project,
        crate::routes::projects::get_project,
        crate::routes::projects::update_project,
        crate::routes::projects::project_analytics,
        crate::routes::projects::create_task,
    ),
    components(
        schemas(
            User,
            Workspace,
            CreateWorkspaceRequest,
            UpdateWorkspaceRequest,
            WorkspaceWithMembers,
            WorkspaceMembers,
            Member,
            MemberProfile,
            MemberWithUser,
            RoleSummary,
            Permission,
            ChangeMemberRoleRequest,
            Project,
            CreatorProfile,
            ProjectWithCreator,
            CreateProjectRequest,
            UpdateProjectRequest,
            ProjectListResponse,
            PaginationInfo,
            Task,
            TaskStatus,
            CreateTaskRequest,
            TaskAnalytics
        )
    ),
    tags(
        (name = "hub-api", description = "Workspace and project management API")
    )
)]
pub struct ApiDoc;
