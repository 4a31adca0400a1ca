//! 用户管理 handlers（仅 Admin）
//!
//! - GET /users - 列出用户
//! - POST /users - 创建用户（口令以 Argon2 哈希存储）
//! - GET /users/{username} - 获取用户
//! - DELETE /users/{username} - 删除用户

use crate::AppState;
use crate::middleware::require_any_role;
use crate::utils::response::{bad_request_error, hierarchy_error, internal_auth_error, ok, user_to_dto};
use crate::utils::validation::normalize_required;
use api_contract::{CreateUserRequest, UserDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::UserType;
use iot_auth::hash_password;
use iot_storage::UserRecord;

const ADMIN_ONLY: [UserType; 1] = [UserType::Admin];

#[derive(serde::Deserialize)]
pub struct UserPath {
    username: String,
}

/// 列出用户
pub async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &ADMIN_ONLY) {
        return response;
    }
    match state.repos.users.list_users().await {
        Ok(items) => {
            let data: Vec<UserDto> = items.into_iter().map(user_to_dto).collect();
            ok(StatusCode::OK, data)
        }
        Err(err) => hierarchy_error(err),
    }
}

/// 创建用户
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &ADMIN_ONLY) {
        return response;
    }
    let username = match normalize_required(req.username, "username") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.password.is_empty() {
        return bad_request_error("password required");
    }
    let user_type = match req.user_type.parse::<UserType>() {
        Ok(value) => value,
        Err(message) => return bad_request_error(message),
    };
    let password = match hash_password(&req.password) {
        Ok(value) => value,
        Err(err) => return internal_auth_error(err),
    };
    let record = UserRecord {
        username,
        password,
        user_type,
    };
    match state.repos.users.create_user(record).await {
        Ok(item) => ok(StatusCode::CREATED, user_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 获取用户
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &ADMIN_ONLY) {
        return response;
    }
    match state.repos.users.get_user(&path.username).await {
        Ok(item) => ok(StatusCode::OK, user_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 删除用户
pub async fn delete_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &ADMIN_ONLY) {
        return response;
    }
    match state.repos.users.delete_user(&path.username).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}
