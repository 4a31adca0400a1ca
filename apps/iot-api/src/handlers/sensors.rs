//! 传感器 CRUD handlers
//!
//! - GET .../gateways/{mac}/sensors - 列出传感器
//! - POST .../gateways/{mac}/sensors - 创建传感器
//! - GET .../sensors/{sensorMac} - 获取传感器详情
//! - PATCH .../sensors/{sensorMac} - 部分更新传感器（可改 mac）
//! - DELETE .../sensors/{sensorMac} - 删除传感器（级联删除测量值）
//!
//! 权限要求：读取全部角色；写入 Admin/Operator

use crate::AppState;
use crate::handlers::gateways::GatewayPath;
use crate::middleware::require_any_role;
use crate::utils::response::{bad_request_error, hierarchy_error, ok, sensor_to_dto};
use crate::utils::validation::{mac_address, optional_text};
use api_contract::{CreateSensorRequest, SensorDto, UpdateSensorRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::UserType;
use iot_storage::{SensorRecord, SensorUpdate};

#[derive(serde::Deserialize)]
pub struct SensorPath {
    pub network_code: String,
    pub gateway_mac: String,
    pub sensor_mac: String,
}

/// 列出传感器
pub async fn list_sensors(
    State(state): State<AppState>,
    Path(path): Path<GatewayPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state
        .repos
        .sensors
        .list_sensors(&path.network_code, &path.gateway_mac)
        .await
    {
        Ok(items) => {
            let data: Vec<SensorDto> = items.into_iter().map(sensor_to_dto).collect();
            ok(StatusCode::OK, data)
        }
        Err(err) => hierarchy_error(err),
    }
}

/// 创建传感器
pub async fn create_sensor(
    State(state): State<AppState>,
    Path(path): Path<GatewayPath>,
    headers: HeaderMap,
    Json(req): Json<CreateSensorRequest>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let mac = match mac_address(req.mac_address, "macAddress") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = SensorRecord {
        mac,
        gateway_mac: path.gateway_mac.clone(),
        name: optional_text(req.name),
        description: optional_text(req.description),
        variable: optional_text(req.variable),
        unit: optional_text(req.unit),
    };
    match state
        .repos
        .sensors
        .create_sensor(&path.network_code, &path.gateway_mac, record)
        .await
    {
        Ok(item) => ok(StatusCode::CREATED, sensor_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 获取传感器详情
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    match state
        .repos
        .sensors
        .get_sensor(&path.network_code, &path.gateway_mac, &path.sensor_mac)
        .await
    {
        Ok(item) => ok(StatusCode::OK, sensor_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

/// 部分更新传感器
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateSensorRequest>,
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
    let update = SensorUpdate {
        mac,
        name: optional_text(req.name),
        description: optional_text(req.description),
        variable: optional_text(req.variable),
        unit: optional_text(req.unit),
    };
    if update.mac.is_none()
        && update.name.is_none()
        && update.description.is_none()
        && update.variable.is_none()
        && update.unit.is_none()
    {
        return bad_request_error("empty update");
    }
    match state
        .repos
        .sensors
        .update_sensor(
            &path.network_code,
            &path.gateway_mac,
            &path.sensor_mac,
            update,
        )
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}

/// 删除传感器
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    match state
        .repos
        .sensors
        .delete_sensor(&path.network_code, &path.gateway_mac, &path.sensor_mac)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => hierarchy_error(err),
    }
}
