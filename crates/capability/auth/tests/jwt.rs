use domain::{AuthContext, UserType};
use iot_auth::{AuthError, JwtManager};
use jsonwebtoken::{EncodingKey, Header};

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = AuthContext::new("alice", UserType::Operator);

    let token = jwt.issue_token(&ctx).expect("token");
    let decoded = jwt.decode(&token.token).expect("decode");

    assert_eq!(decoded.username, "alice");
    assert_eq!(decoded.user_type, UserType::Operator);
    assert!(token.expires_at > 0);
}

#[test]
fn token_signed_with_other_secret_is_invalid() {
    let issuer = JwtManager::new("secret-a".to_string(), 3600);
    let verifier = JwtManager::new("secret-b".to_string(), 3600);
    let token = issuer
        .issue_token(&AuthContext::new("alice", UserType::Admin))
        .expect("token");
    assert!(matches!(
        verifier.decode(&token.token),
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(verifier.decode("garbage"), Err(AuthError::TokenInvalid)));
}

#[test]
fn expired_token_is_reported() {
    let claims = serde_json::json!({ "sub": "alice", "type": "viewer", "exp": 1_000 });
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"secret"),
    )
    .expect("encode");
    let jwt = JwtManager::new("secret".to_string(), 3600);
    assert!(matches!(jwt.decode(&token), Err(AuthError::TokenExpired)));
}
