mod common;

use common::fixture;
use domain::UserType;
use iot_hierarchy::HierarchyError;
use iot_storage::UserRecord;

fn user(name: &str, user_type: UserType) -> UserRecord {
    UserRecord {
        username: name.to_string(),
        password: "pw".to_string(),
        user_type,
    }
}

#[tokio::test]
async fn user_lifecycle() {
    let fixture = fixture();
    let users = &fixture.repos.users;
    users
        .create_user(user("alice", UserType::Operator))
        .await
        .expect("create");
    assert!(matches!(
        users
            .create_user(user("alice", UserType::Viewer))
            .await
            .unwrap_err(),
        HierarchyError::Conflict(_)
    ));
    assert_eq!(
        users.get_user("alice").await.expect("get").user_type,
        UserType::Operator
    );
    users.delete_user("alice").await.expect("delete");
    assert!(matches!(
        users.get_user("alice").await.unwrap_err(),
        HierarchyError::NotFound(_)
    ));
    assert!(matches!(
        users.delete_user("alice").await.unwrap_err(),
        HierarchyError::NotFound(_)
    ));
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
    let fixture = fixture();
    let users = &fixture.repos.users;
    assert!(users.ensure_user(user("admin", UserType::Admin)).await.expect("first"));
    assert!(!users.ensure_user(user("admin", UserType::Viewer)).await.expect("second"));
    assert_eq!(
        users.get_user("admin").await.expect("get").user_type,
        UserType::Admin
    );
    assert_eq!(users.list_users().await.expect("list").len(), 1);
}
