//! Integration tests for workspace provisioning and workspace reads.

mod common;

use hub_service::{
    CreateTaskRequest, CreateWorkspaceRequest, ServiceError, TaskService, TaskStatus,
    UpdateWorkspaceRequest, UserService, WorkspaceService,
};

#[tokio::test]
async fn test_create_workspace_provisions_owner_membership() {
    let pool = common::create_test_db().await;
    let user = common::fixture_user(&pool, "alice").await;
    let service = WorkspaceService::new(pool.clone());

    let workspace = service
        .create_workspace(
            &user.id,
            CreateWorkspaceRequest {
                name: "Acme".to_string(),
                description: None,
            },
        )
        .await
        .expect("Failed to create workspace");

    assert_eq!(workspace.name, "Acme");
    assert_eq!(workspace.owner, user.id);
    assert_eq!(workspace.description, None);

    // Exactly one membership, with the OWNER role
    let with_members = service
        .get_workspace_with_members(&workspace.id)
        .await
        .expect("Failed to load members");
    assert_eq!(with_members.members.len(), 1);
    let member = &with_members.members[0];
    assert_eq!(member.user_id, user.id);
    assert_eq!(member.workspace_id, workspace.id);
    assert_eq!(member.role.name, "OWNER");
    assert_eq!(common::count(&pool, "members").await, 1);

    // Current workspace pointer moved to the new workspace
    let user = UserService::new(pool.clone())
        .get_user(&user.id)
        .await
        .expect("Failed to reload user");
    assert_eq!(user.current_workspace, Some(workspace.id));
}

#[tokio::test]
async fn test_create_workspace_for_unknown_user_writes_nothing() {
    let pool = common::create_test_db().await;
    let service = WorkspaceService::new(pool.clone());

    let result = service
        .create_workspace(
            "no-such-user",
            CreateWorkspaceRequest {
                name: "Acme".to_string(),
                description: None,
            },
        )
        .await;

    match result {
        Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "User not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert_eq!(common::count(&pool, "workspaces").await, 0);
    assert_eq!(common::count(&pool, "members").await, 0);
}

#[tokio::test]
async fn test_create_workspace_without_seeded_roles_fails() {
    let pool = common::create_empty_db().await;
    let user = common::fixture_user(&pool, "alice").await;

    let result = WorkspaceService::new(pool.clone())
        .create_workspace(
            &user.id,
            CreateWorkspaceRequest {
                name: "Acme".to_string(),
                description: Some("No roles yet".to_string()),
            },
        )
        .await;

    match result {
        Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Owner role not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert_eq!(common::count(&pool, "workspaces").await, 0);
}

#[tokio::test]
async fn test_create_workspace_rolls_back_when_user_update_fails() {
    let pool = common::create_test_db().await;
    let user = common::fixture_user(&pool, "alice").await;

    // The workspace and member inserts succeed; the last statement aborts.
    sqlx::query(
        "CREATE TRIGGER block_user_updates BEFORE UPDATE ON users
         BEGIN SELECT RAISE(ABORT, 'user updates disabled'); END",
    )
    .execute(&pool)
    .await
    .expect("Failed to create trigger");

    let result = WorkspaceService::new(pool.clone())
        .create_workspace(
            &user.id,
            CreateWorkspaceRequest {
                name: "Acme".to_string(),
                description: None,
            },
        )
        .await;

    match result {
        Err(ServiceError::Database(_)) => {}
        other => panic!("Expected Database error, got {:?}", other),
    }
    assert_eq!(common::count(&pool, "workspaces").await, 0);
    assert_eq!(common::count(&pool, "members").await, 0);

    let user = UserService::new(pool.clone())
        .get_user(&user.id)
        .await
        .expect("Failed to reload user");
    assert_eq!(user.current_workspace, None);
}

#[tokio::test]
async fn test_create_workspace_rejects_blank_name() {
    let pool = common::create_test_db().await;
    let user = common::fixture_user(&pool, "alice").await;

    let result = WorkspaceService::new(pool.clone())
        .create_workspace(
            &user.id,
            CreateWorkspaceRequest {
                name: "   ".to_string(),
                description: None,
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert_eq!(common::count(&pool, "workspaces").await, 0);
}

#[tokio::test]
async fn test_list_workspaces_for_member() {
    let pool = common::create_test_db().await;
    let alice = common::fixture_user(&pool, "alice").await;
    let bob = common::fixture_user(&pool, "bob").await;

    let first = common::fixture_workspace(&pool, &alice, "first").await;
    let second = common::fixture_workspace(&pool, &alice, "second").await;
    let bobs = common::fixture_workspace(&pool, &bob, "bobs").await;
    common::add_member(&pool, &bobs, &alice, "MEMBER").await;

    let service = WorkspaceService::new(pool.clone());
    let alice_workspaces = service
        .list_workspaces_for_member(&alice.id)
        .await
        .expect("Failed to list workspaces");

    let ids: Vec<_> = alice_workspaces.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec![bobs.id.as_str(), second.id.as_str(), first.id.as_str()]);

    let bob_workspaces = service
        .list_workspaces_for_member(&bob.id)
        .await
        .expect("Failed to list workspaces");
    assert_eq!(bob_workspaces.len(), 1);
    assert_eq!(bob_workspaces[0].id, bobs.id);
}

#[tokio::test]
async fn test_get_unknown_workspace_is_not_found() {
    let pool = common::create_test_db().await;
    let service = WorkspaceService::new(pool);

    let result = service.get_workspace_with_members("missing").await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_workspace_members_include_profiles_and_roles() {
    let pool = common::create_test_db().await;
    let alice = common::fixture_user(&pool, "alice").await;
    let bob = common::fixture_user(&pool, "bob").await;
    let workspace = common::fixture_workspace(&pool, &alice, "team").await;
    common::add_member(&pool, &workspace, &bob, "ADMIN").await;

    let listing = WorkspaceService::new(pool.clone())
        .workspace_members(&workspace.id)
        .await
        .expect("Failed to list members");

    assert_eq!(listing.members.len(), 2);
    assert_eq!(listing.members[0].user.name, "alice");
    assert_eq!(listing.members[0].member.role.name, "OWNER");
    assert_eq!(listing.members[1].user.email, "bob@example.com");
    assert_eq!(listing.members[1].member.role.name, "ADMIN");

    let mut role_names: Vec<_> = listing.roles.iter().map(|r| r.name.as_str()).collect();
    role_names.sort();
    assert_eq!(role_names, vec!["ADMIN", "MEMBER", "OWNER"]);

    // Credential hashes never appear in the serialized listing
    let json = serde_json::to_string(&listing).unwrap();
    assert!(!json.contains("argon2"));
    assert!(!json.contains("password"));
}

#[tokio::test]
async fn test_update_workspace_keeps_blank_fields() {
    let pool = common::create_test_db().await;
    let alice = common::fixture_user(&pool, "alice").await;
    let workspace = common::fixture_workspace(&pool, &alice, "original").await;
    let service = WorkspaceService::new(pool.clone());

    let updated = service
        .update_workspace(
            &workspace.id,
            UpdateWorkspaceRequest {
                name: None,
                description: Some("Now with a description".to_string()),
            },
        )
        .await
        .expect("Failed to update workspace");
    assert_eq!(updated.name, "original");
    assert_eq!(updated.description.as_deref(), Some("Now with a description"));

    let updated = service
        .update_workspace(
            &workspace.id,
            UpdateWorkspaceRequest {
                name: Some("renamed".to_string()),
                description: Some(String::new()),
            },
        )
        .await
        .expect("Failed to update workspace");
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.description.as_deref(), Some("Now with a description"));
}

#[tokio::test]
async fn test_workspace_analytics_counts_tasks() {
    let pool = common::create_test_db().await;
    let alice = common::fixture_user(&pool, "alice").await;
    let workspace = common::fixture_workspace(&pool, &alice, "team").await;
    let project = common::fixture_project(&pool, &alice, &workspace, "roadmap").await;
    let tasks = TaskService::new(pool.clone());

    let yesterday = chrono::Utc::now() - chrono::Duration::days(1);
    let tomorrow = chrono::Utc::now() + chrono::Duration::days(1);
    let specs = [
        ("overdue", TaskStatus::Todo, Some(yesterday)),
        ("done late", TaskStatus::Done, Some(yesterday)),
        ("future", TaskStatus::InProgress, Some(tomorrow)),
        ("undated", TaskStatus::Done, None),
    ];
    for (title, status, due_date) in specs {
        tasks
            .create_task(
                &alice.id,
                &workspace.id,
                &project.id,
                CreateTaskRequest {
                    title: title.to_string(),
                    description: None,
                    status: Some(status),
                    due_date,
                },
            )
            .await
            .expect("Failed to create task");
    }

    let analytics = WorkspaceService::new(pool.clone())
        .workspace_analytics(&workspace.id)
        .await
        .expect("Failed to compute analytics");

    assert_eq!(analytics.total_tasks, 4);
    assert_eq!(analytics.overdue_tasks, 1);
    assert_eq!(analytics.completed_tasks, 2);
}
