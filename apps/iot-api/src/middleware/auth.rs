//! 认证和授权中间件
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_auth：验证 token 并提取调用方上下文
//! - require_role：检查调用方角色是否在允许列表内
//!
//! 认证流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. bearer_token：从请求头提取 token
//! 3. require_auth：验证 JWT 签名与过期时间，获取 AuthContext
//! 4. require_role：角色不足返回 403

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use domain::{AuthContext, UserType};
use iot_auth::AuthError;
use iot_telemetry::{new_request_ids, record_request_handled};
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, forbidden_error, internal_auth_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response: Response = next.run(req).instrument(span).await;
    record_request_handled();
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 验证并提取调用方上下文
pub fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, Response> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Err(auth_error(StatusCode::UNAUTHORIZED)),
    };
    match state.auth.verify_access_token(token) {
        Ok(ctx) => Ok(ctx),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 检查角色
pub fn require_role(ctx: &AuthContext, allowed: &[UserType]) -> Result<(), Response> {
    if ctx.has_any_role(allowed) {
        return Ok(());
    }
    tracing::warn!(
        username = %ctx.username,
        user_type = %ctx.user_type,
        "role not allowed"
    );
    Err(forbidden_error())
}

/// 认证并检查角色
pub fn require_any_role(
    state: &AppState,
    headers: &HeaderMap,
    allowed: &[UserType],
) -> Result<AuthContext, Response> {
    let ctx = require_auth(state, headers)?;
    require_role(&ctx, allowed)?;
    Ok(ctx)
}
