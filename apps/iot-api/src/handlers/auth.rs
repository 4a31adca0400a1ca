//! 认证相关 handlers：健康检查、就绪检查、登录
//!
//! ## 提供的端点（均无需认证）
//! - `GET /health` - 存活检查，返回 `{"ok": true}`
//! - `GET /readyz` - 就绪检查（配置了 Postgres 时执行 `select 1`）
//! - `POST /api/v1/auth` - 用户登录，返回 `{token}`
//!
//! ## 登录结果
//! - 用户不存在：404
//! - 口令错误：401
//! - 成功：200，token 的 claims 含 `sub`（用户名）、`type`（用户类型）、`exp`

use crate::AppState;
use crate::utils::response::{auth_error, internal_auth_error, not_found_error, ok};
use crate::utils::validation::normalize_required;
use api_contract::{LoginRequest, TokenDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_auth::AuthError;

/// 存活检查：只反映进程存活，不做外部依赖检查。
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 就绪检查：反映关键依赖是否就绪（当前检查 Postgres 连接）。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 登录
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    let username = match normalize_required(req.username, "username") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.auth.login(&username, &req.password).await {
        Ok((_, token)) => ok(StatusCode::OK, TokenDto { token: token.token }),
        Err(AuthError::UserNotFound) => not_found_error(format!("user {username} not found")),
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(err) => internal_auth_error(err),
    }
}
