use domain::UserType;
use iot_auth::{AuthError, AuthService, JwtManager, hash_password};
use iot_storage::{InMemoryStore, UserRecord, UserStore};
use std::sync::Arc;

async fn service() -> AuthService {
    let store = Arc::new(InMemoryStore::with_default_admin("admin123"));
    store
        .insert_user(UserRecord {
            username: "op".to_string(),
            password: hash_password("op-pass").expect("hash"),
            user_type: UserType::Operator,
        })
        .await
        .expect("insert");
    AuthService::new(store, JwtManager::new("secret".to_string(), 3600))
}

#[tokio::test]
async fn login_issues_token_for_plaintext_seed() {
    let auth = service().await;
    let (user, token) = auth.login("admin", "admin123").await.expect("login");
    assert_eq!(user.user_type, UserType::Admin);
    let ctx = auth.verify_access_token(&token.token).expect("verify");
    assert_eq!(ctx.username, "admin");
    assert_eq!(ctx.user_type, UserType::Admin);
}

#[tokio::test]
async fn login_with_hashed_password() {
    let auth = service().await;
    let (_, token) = auth.login("op", "op-pass").await.expect("login");
    let ctx = auth.verify_access_token(&token.token).expect("verify");
    assert_eq!(ctx.user_type, UserType::Operator);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_distinguished() {
    let auth = service().await;
    assert!(matches!(
        auth.login("ghost", "x").await,
        Err(AuthError::UserNotFound)
    ));
    assert!(matches!(
        auth.login("admin", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));
}
