//! 网关 CRUD handlers
//!
//! - GET /networks/{code}/gateways - 列出网关（含传感器）
//! - POST /networks/{code}/gateways - 创建网关
//! - GET /networks/{code}/gateways/{mac} - 获取网关详情
//! - PATCH /networks/{code}/gateways/{mac} - 部分更新网关（可改 mac）
//! - DELETE /networks/{code}/gateways/{mac} - 删除网关（级联）
//!
//! 权限要求：读取全部角色；写入 Admin/Operator

use crate::AppState;
use crate::handlers::networks::NetworkPath;
use crate::middleware::require_any_role;
use crate::utils::response::{bad_request_error, gateway_to_dto, hierarchy_error, ok};
use crate::utils::validation::{mac_address, optional_text};
use api_contract::{CreateGatewayRequest, GatewayDto, UpdateGatewayRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::UserType;
use iot_hierarchy::GatewayTree;
use iot_storage::{GatewayRecord, GatewayUpdate};

#[derive(serde::Deserialize)]
pub struct GatewayPath {
    pub network_code: String,
    pub gateway_mac: String,
}

/// 列出网关
pub async fn list_gateways(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state.repos.gateways.list_gateways(&path.network_code).await {
        Ok(items) => {
            let data: Vec<GatewayDto> = items.into_iter().map(gateway_to_dto).collect();
            ok(StatusCode::OK, data)
        }
        Err(err) => hierarchy_error(err),
    }
}

/// 创建网关
pub async fn create_gateway(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
    Json(req): Json<CreateGatewayRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let mac = match mac_address(req.mac_address, "macAddress") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = GatewayRecord {
        mac,
        network_code: path.network_code.clone(),
        name: optional_text(req.name),
        description: optional_text(req.description),
    };
    match state
        .repos
        .gateways
        .create_gateway(&path.network_code, record)
        .await
    {
        Ok(item) => ok(
            StatusCode::CREATED,
            gateway_to_dto(GatewayTree {
                gateway: item,
                sensors: Vec::new(),
            }),
        ),
        Err(err) => hierarchy_error(err),
    }
}

/// 获取网关详情
pub async fn get_gateway(
    State(state): State<AppState>,
    Path(path): Path<GatewayPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state
        .repos
        .gateways
        .get_gateway(&path.network_code, &path.gateway_mac)
        .await
    {
        Ok(item) => ok(StatusCode::OK, gateway_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 部分更新网关
pub async fn update_gateway(
    State(state): State<AppState>,
    Path(path): Path<GatewayPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateGatewayRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let mac = match req
        .mac_address
        .map(|mac| mac_address(mac, "macAddress"))
        .transpose()
    {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = GatewayUpdate {
        mac,
        name: optional_text(req.name),
        description: optional_text(req.description),
    };
    if update.mac.is_none() && update.name.is_none() && update.description.is_none() {
        return bad_request_error("empty update");
    }
    match state
        .repos
        .gateways
        .update_gateway(&path.network_code, &path.gateway_mac, update)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}

/// 删除网关
pub async fn delete_gateway(
    State(state): State<AppState>,
    Path(path): Path<GatewayPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    match state
        .repos
        .gateways
        .delete_gateway(&path.network_code, &path.gateway_mac)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}
