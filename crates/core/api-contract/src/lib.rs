//! 稳定的 DTO 与 API 响应契约。
//!
//! 可选字段未设置时不输出（不输出 `null` 或空字符串），
//! 子实体数组为空时整个字段省略。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDto {
    pub token: String,
}

/// 用户创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

/// 用户返回结构（不含口令）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub username: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

/// 网络创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkRequest {
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网络部分更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网络返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDto {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gateways: Vec<GatewayDto>,
}

/// 网关创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayRequest {
    pub mac_address: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网关部分更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGatewayRequest {
    pub mac_address: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网关返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayDto {
    pub mac_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sensors: Vec<SensorDto>,
}

/// 传感器创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensorRequest {
    pub mac_address: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub variable: Option<String>,
    pub unit: Option<String>,
}

/// 传感器部分更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensorRequest {
    pub mac_address: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub variable: Option<String>,
    pub unit: Option<String>,
}

/// 传感器返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDto {
    pub mac_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// 测量值写入请求体中的单条读数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementInput {
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

/// 单条测量值（带异常标记）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementDto {
    pub created_at: DateTime<Utc>,
    pub value: f64,
    pub is_outlier: bool,
}

/// 统计量；时间窗两端仅在查询指定时输出。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub mean: f64,
    pub variance: f64,
    pub upper_threshold: f64,
    pub lower_threshold: f64,
}

/// 单个传感器的测量值结果；无数据时只含 `sensorMacAddress`。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsDto {
    pub sensor_mac_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements: Option<Vec<MeasurementDto>>,
}

/// 写入结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMeasurementsDto {
    pub stored: usize,
}

/// 基础指标快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub measurements_written: u64,
    pub measurements_failed: u64,
    pub stats_computed: u64,
    pub outliers_flagged: u64,
    pub requests_handled: u64,
}
