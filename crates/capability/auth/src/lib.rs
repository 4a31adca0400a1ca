//! 认证能力：登录、JWT 生成与校验、口令哈希。

mod jwt;
mod password;

use domain::AuthContext;
use iot_storage::{UserRecord, UserStore};
use std::sync::Arc;

pub use jwt::JwtManager;
pub use password::{hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 签发的 access token。
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    /// 过期时间（epoch 秒）
    pub expires_at: u64,
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtManager) -> Self {
        Self { user_store, jwt }
    }

    /// 登录校验并签发 token。
    ///
    /// 用户不存在返回 `UserNotFound`，口令错误返回 `InvalidCredentials`。
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthToken), AuthError> {
        let user = self
            .user_store
            .find_user(username)
            .await
            .map_err(|err| AuthError::Internal(err.to_string()))?
            .ok_or(AuthError::UserNotFound)?;
        if !verify_password(&user.password, password)? {
            tracing::warn!(username, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        let ctx = AuthContext::new(user.username.clone(), user.user_type);
        let token = self.jwt.issue_token(&ctx)?;
        tracing::info!(username, user_type = %user.user_type, "login succeeded");
        Ok((user, token))
    }

    /// 校验 access token 并提取 AuthContext。
    pub fn verify_access_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.jwt.decode(token)
    }
}
