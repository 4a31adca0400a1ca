//! 网络 CRUD handlers
//!
//! - GET /networks - 列出网络（含网关与传感器）
//! - POST /networks - 创建网络
//! - GET /networks/{code} - 获取网络详情
//! - PATCH /networks/{code} - 部分更新网络（可改 code）
//! - DELETE /networks/{code} - 删除网络（级联）
//!
//! 权限要求：读取全部角色；写入 Admin/Operator

use crate::AppState;
use crate::middleware::require_any_role;
use crate::utils::response::{bad_request_error, hierarchy_error, network_to_dto, ok};
use crate::utils::validation::{network_code, optional_text};
use api_contract::{CreateNetworkRequest, NetworkDto, UpdateNetworkRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::UserType;
use iot_hierarchy::NetworkTree;
use iot_storage::{NetworkRecord, NetworkUpdate};

#[derive(serde::Deserialize)]
pub struct NetworkPath {
    pub network_code: String,
}

/// 列出网络
pub async fn list_networks(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state.repos.networks.list_networks().await {
        Ok(items) => {
            let data: Vec<NetworkDto> = items.into_iter().map(network_to_dto).collect();
            ok(StatusCode::OK, data)
        }
        Err(err) => hierarchy_error(err),
    }
}

/// 创建网络
pub async fn create_network(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateNetworkRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let code = match network_code(req.code, "code") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = NetworkRecord {
        code,
        name: optional_text(req.name),
        description: optional_text(req.description),
    };
    match state.repos.networks.create_network(record).await {
        Ok(item) => ok(
            StatusCode::CREATED,
            network_to_dto(NetworkTree {
                network: item,
                gateways: Vec::new(),
            }),
        ),
        Err(err) => hierarchy_error(err),
    }
}

/// 获取网络详情
pub async fn get_network(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state.repos.networks.get_network(&path.network_code).await {
        Ok(item) => ok(StatusCode::OK, network_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 部分更新网络
pub async fn update_network(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateNetworkRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let code = match req.code.map(|code| network_code(code, "code")).transpose() {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = NetworkUpdate {
        code,
        name: optional_text(req.name),
        description: optional_text(req.description),
    };
    if update.code.is_none() && update.name.is_none() && update.description.is_none() {
        return bad_request_error("empty update");
    }
    match state
        .repos
        .networks
        .update_network(&path.network_code, update)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}

/// 删除网络
pub async fn delete_network(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    match state.repos.networks.delete_network(&path.network_code).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}
