//! Workspace, membership and project business logic
//!
//! This crate owns storage access and the role/permission gate. It is
//! consumed by the hub-api HTTP service and the role seeding binary.

pub mod db;
pub mod error;
pub mod member;
pub mod pagination;
pub mod permission;
pub mod project;
pub mod role;
pub mod task;
pub mod user;
pub mod validate;
pub mod workspace;

pub use error::{Result, ServiceError};
pub use member::{Member, MemberProfile, MemberService, MemberWithUser};
pub use pagination::{Page, PageRequest};
pub use permission::{Permission, PermissionTable, StandardRole};
pub use project::{
    CreateProjectRequest, CreatorProfile, Project, ProjectService, ProjectWithCreator,
    UpdateProjectRequest,
};
pub use role::{Role, RoleService, RoleSummary, SeedReport};
pub use task::{CreateTaskRequest, Task, TaskAnalytics, TaskService, TaskStatus};
pub use user::{CreateUserRequest, User, UserService};
pub use workspace::{
    CreateWorkspaceRequest, UpdateWorkspaceRequest, Workspace, WorkspaceMembers,
    WorkspaceService, WorkspaceWithMembers,
};
