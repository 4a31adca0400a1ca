use crate::{AuthError, AuthToken};
use domain::{AuthContext, UserType};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    #[serde(rename = "type")]
    user_type: UserType,
    exp: usize,
}

/// JWT 生成与校验（HS256）。
pub struct JwtManager {
    secret: Vec<u8>,
    ttl_seconds: u64,
}

impl JwtManager {
    /// 创建 JWT 管理器。
    pub fn new(secret: String, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            ttl_seconds,
        }
    }

    /// 基于 AuthContext 签发 access token。
    pub fn issue_token(&self, ctx: &AuthContext) -> Result<AuthToken, AuthError> {
        let expires_at = now_epoch_seconds() + self.ttl_seconds;
        let claims = Claims {
            sub: ctx.username.clone(),
            user_type: ctx.user_type,
            exp: expires_at as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(AuthToken { token, expires_at })
    }

    /// 解析 access token。
    pub fn decode(&self, token: &str) -> Result<AuthContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let decoded = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?;
        Ok(AuthContext::new(decoded.claims.sub, decoded.claims.user_type))
    }
}

/// 当前时间戳（秒）。
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
