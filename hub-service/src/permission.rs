//! Role → permission table and the gate that checks a role against the
//! permissions an action requires.
//!
//! The table is built once at startup and shared read-only (`Arc`) by every
//! request handler.

use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use utoipa::ToSchema;

pub const DENIED_MESSAGE: &str = "You do not have the necessary permissions to perform this action";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    CreateWorkspace,
    DeleteWorkspace,
    EditWorkspace,
    ManageWorkspaceSettings,
    AddMember,
    ChangeMemberRole,
    RemoveMember,
    CreateProject,
    EditProject,
    DeleteProject,
    CreateTask,
    EditTask,
    DeleteTask,
    ViewOnly,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::CreateWorkspace,
        Permission::DeleteWorkspace,
        Permission::EditWorkspace,
        Permission::ManageWorkspaceSettings,
        Permission::AddMember,
        Permission::ChangeMemberRole,
        Permission::RemoveMember,
        Permission::CreateProject,
        Permission::EditProject,
        Permission::DeleteProject,
        Permission::CreateTask,
        Permission::EditTask,
        Permission::DeleteTask,
        Permission::ViewOnly,
    ];
}

/// Roles seeded at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardRole {
    Owner,
    Admin,
    Member,
}

impl StandardRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl std::fmt::Display for StandardRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    roles: BTreeMap<String, BTreeSet<Permission>>,
}

impl PermissionTable {
    /// OWNER holds every permission, ADMIN everything but workspace-level
    /// ownership actions, MEMBER can view and work on tasks.
    pub fn standard() -> Self {
        use Permission::*;

        Self::default()
            .with_role(StandardRole::Owner.as_str(), Permission::ALL)
            .with_role(
                StandardRole::Admin.as_str(),
                [
                    AddMember,
                    CreateProject,
                    EditProject,
                    DeleteProject,
                    CreateTask,
                    EditTask,
                    DeleteTask,
                    ManageWorkspaceSettings,
                    ViewOnly,
                ],
            )
            .with_role(
                StandardRole::Member.as_str(),
                [ViewOnly, CreateTask, EditTask],
            )
    }

    pub fn with_role(
        mut self,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.roles
            .insert(name.into(), permissions.into_iter().collect());
        self
    }

    pub fn permissions(&self, role: &str) -> Option<&BTreeSet<Permission>> {
        self.roles.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &BTreeSet<Permission>)> {
        self.roles.iter().map(|(name, perms)| (name.as_str(), perms))
    }

    /// Allow only if every required permission is granted to `role`.
    ///
    /// An unknown role has no permissions, so every check against it fails.
    pub fn check(&self, role: &str, required: &[Permission]) -> Result<()> {
        let Some(granted) = self.roles.get(role) else {
            warn!(role, ?required, "permission check against unknown role");
            return Err(ServiceError::Unauthorized(DENIED_MESSAGE.to_string()));
        };

        if required.iter().all(|p| granted.contains(p)) {
            return Ok(());
        }

        debug!(role, ?required, "permission denied");
        Err(ServiceError::Unauthorized(DENIED_MESSAGE.to_string()))
    }
}
