//! 测量值 handlers
//!
//! 网络级（查询参数 `sensorMacs`、`startDate`、`endDate`）：
//! - GET /networks/{code}/measurements
//! - GET /networks/{code}/stats
//! - GET /networks/{code}/outliers
//!
//! 传感器级（查询参数 `startDate`、`endDate`）：
//! - POST .../sensors/{sensorMac}/measurements - 批量写入（Admin/Operator）
//! - GET .../sensors/{sensorMac}/measurements
//! - GET .../sensors/{sensorMac}/stats
//! - GET .../sensors/{sensorMac}/outliers

use crate::AppState;
use crate::handlers::networks::NetworkPath;
use crate::handlers::sensors::SensorPath;
use crate::middleware::require_any_role;
use crate::utils::response::{hierarchy_error, ok, sensor_measurements_to_dto, stats_to_dto};
use crate::utils::validation::parse_measurement_query;
use api_contract::{MeasurementInput, MeasurementsDto, StoredMeasurementsDto};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use domain::UserType;
use iot_hierarchy::{HierarchyError, Reading};
use iot_stats::{AggregateMode, SensorMeasurements};

/// 写入传感器测量值
pub async fn store_measurements(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
    Json(req): Json<Vec<MeasurementInput>>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::WRITERS) {
        return response;
    }
    let readings: Vec<Reading> = req
        .into_iter()
        .map(|item| Reading {
            created_at: item.created_at,
            value: item.value,
        })
        .collect();
    match state
        .repos
        .measurements
        .store_measurements(
            &path.network_code,
            &path.gateway_mac,
            &path.sensor_mac,
            readings,
        )
        .await
    {
        Ok(stored) => ok(StatusCode::CREATED, StoredMeasurementsDto { stored }),
        Err(err) => hierarchy_error(err),
    }
}

/// 网络级测量值
pub async fn get_network_measurements(
    state: State<AppState>,
    path: Path<NetworkPath>,
    headers: HeaderMap,
    query: Query<Vec<(String, String)>>,
) -> Response {
    network_query(state, path, headers, query, AggregateMode::Measurements).await
}

/// 网络级统计量
pub async fn get_network_stats(
    state: State<AppState>,
    path: Path<NetworkPath>,
    headers: HeaderMap,
    query: Query<Vec<(String, String)>>,
) -> Response {
    network_query(state, path, headers, query, AggregateMode::StatsOnly).await
}

/// 网络级异常值
pub async fn get_network_outliers(
    state: State<AppState>,
    path: Path<NetworkPath>,
    headers: HeaderMap,
    query: Query<Vec<(String, String)>>,
) -> Response {
    network_query(state, path, headers, query, AggregateMode::Outliers).await
}

/// 传感器测量值
pub async fn get_sensor_measurements(
    state: State<AppState>,
    path: Path<SensorPath>,
    headers: HeaderMap,
    query: Query<Vec<(String, String)>>,
) -> Response {
    sensor_query(state, path, headers, query, AggregateMode::Measurements).await
}

/// 传感器异常值
pub async fn get_sensor_outliers(
    state: State<AppState>,
    path: Path<SensorPath>,
    headers: HeaderMap,
    query: Query<Vec<(String, String)>>,
) -> Response {
    sensor_query(state, path, headers, query, AggregateMode::Outliers).await
}

/// 传感器统计量（无数据时为全零统计量）
pub async fn get_sensor_stats(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    let query = match parse_measurement_query(&query) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .repos
        .measurements
        .get_stats_by_sensor(
            &path.network_code,
            &path.gateway_mac,
            &path.sensor_mac,
            &query.window,
        )
        .await
    {
        Ok(stats) => ok(StatusCode::OK, stats_to_dto(stats)),
        Err(err) => hierarchy_error(err),
    }
}

async fn network_query(
    State(state): State<AppState>,
    Path(path): Path<NetworkPath>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    mode: AggregateMode,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    let query = match parse_measurement_query(&query) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let repo = &state.repos.measurements;
    let network_code = path.network_code.as_str();
    let sensor_macs = query.sensor_macs.as_deref();
    let result = match mode {
        AggregateMode::Measurements => {
            repo.get_measurements_by_network(network_code, sensor_macs, &query.window)
                .await
        }
        AggregateMode::StatsOnly => {
            repo.get_stats_by_network(network_code, sensor_macs, &query.window)
                .await
        }
        AggregateMode::Outliers => {
            repo.get_outliers_by_network(network_code, sensor_macs, &query.window)
                .await
        }
    };
    respond_list(result)
}

async fn sensor_query(
    State(state): State<AppState>,
    Path(path): Path<SensorPath>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    mode: AggregateMode,
) -> Response {
    if let Err(response) = require_any_role(&state, &headers, &UserType::ALL) {
        return response;
    }
    let query = match parse_measurement_query(&query) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let repo = &state.repos.measurements;
    let result = match mode {
        AggregateMode::Outliers => {
            repo.get_outliers_by_sensor(
                &path.network_code,
                &path.gateway_mac,
                &path.sensor_mac,
                &query.window,
            )
            .await
        }
        _ => {
            repo.get_measurements_by_sensor(
                &path.network_code,
                &path.gateway_mac,
                &path.sensor_mac,
                &query.window,
            )
            .await
        }
    };
    match result {
        Ok(item) => ok(StatusCode::OK, sensor_measurements_to_dto(item)),
        Err(err) => hierarchy_error(err),
    }
}

fn respond_list(result: Result<Vec<SensorMeasurements>, HierarchyError>) -> Response {
    match result {
        Ok(items) => {
            let data: Vec<MeasurementsDto> =
                items.into_iter().map(sensor_measurements_to_dto).collect();
            ok(StatusCode::OK, data)
        }
        Err(err) => hierarchy_error(err),
    }
}
