//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error, not_found_error,
//!   internal_auth_error, hierarchy_error
//! - DTO 转换：network_to_dto, gateway_to_dto, sensor_to_dto, user_to_dto,
//!   stats_to_dto, sensor_measurements_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - 可选字段原样透传，由 DTO 的 serde 属性决定是否输出

use api_contract::{
    ApiResponse, GatewayDto, MeasurementDto, MeasurementsDto, NetworkDto, SensorDto, StatsDto,
    UserDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_auth::AuthError;
use iot_hierarchy::{GatewayTree, HierarchyError, NetworkTree};
use iot_stats::{SensorMeasurements, Stats};
use iot_storage::{SensorRecord, UserRecord};

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", "forbidden")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

/// 资源冲突错误响应
pub fn conflict_error(message: impl Into<String>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error("RESOURCE.CONFLICT", message.into())),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    tracing::error!(error = %err, "auth failure");
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 仓储错误响应：NotFound → 404，Conflict → 409，存储故障 → 500
pub fn hierarchy_error(err: HierarchyError) -> Response {
    let message = err.to_string();
    match err {
        HierarchyError::NotFound(_) => not_found_error(message),
        HierarchyError::Conflict(_) => conflict_error(message),
        HierarchyError::Storage(_) => {
            tracing::error!(error = %message, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
            )
                .into_response()
        }
    }
}

/// 成功响应（带数据）
pub fn ok<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::success(data))).into_response()
}

/// NetworkTree 转 NetworkDto
pub fn network_to_dto(tree: NetworkTree) -> NetworkDto {
    NetworkDto {
        code: tree.network.code,
        name: tree.network.name,
        description: tree.network.description,
        gateways: tree.gateways.into_iter().map(gateway_to_dto).collect(),
    }
}

/// GatewayTree 转 GatewayDto
pub fn gateway_to_dto(tree: GatewayTree) -> GatewayDto {
    GatewayDto {
        mac_address: tree.gateway.mac,
        name: tree.gateway.name,
        description: tree.gateway.description,
        sensors: tree.sensors.into_iter().map(sensor_to_dto).collect(),
    }
}

/// SensorRecord 转 SensorDto
pub fn sensor_to_dto(record: SensorRecord) -> SensorDto {
    SensorDto {
        mac_address: record.mac,
        name: record.name,
        description: record.description,
        variable: record.variable,
        unit: record.unit,
    }
}

/// UserRecord 转 UserDto（不输出口令）
pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        username: record.username,
        user_type: record.user_type.to_string(),
    }
}

pub fn stats_to_dto(stats: Stats) -> StatsDto {
    StatsDto {
        start_date: stats.start_date,
        end_date: stats.end_date,
        mean: stats.mean,
        variance: stats.variance,
        upper_threshold: stats.upper_threshold,
        lower_threshold: stats.lower_threshold,
    }
}

pub fn sensor_measurements_to_dto(item: SensorMeasurements) -> MeasurementsDto {
    MeasurementsDto {
        sensor_mac_address: item.sensor_mac,
        stats: item.stats.map(stats_to_dto),
        measurements: item.measurements.filter(|items| !items.is_empty()).map(|items| {
            items
                .into_iter()
                .map(|item| MeasurementDto {
                    created_at: item.created_at,
                    value: item.value,
                    is_outlier: item.is_outlier,
                })
                .collect()
        }),
    }
}
