//! 路由定义
//!
//! 集中管理 `/api/v1` 下的业务路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 认证接口：/auth
//! - 用户管理：/users/*
//! - 网络管理：/networks/*
//! - 网关管理：/networks/{code}/gateways/*
//! - 传感器管理：/networks/{code}/gateways/{mac}/sensors/*
//! - 测量值：网络级 /networks/{code}/{measurements,stats,outliers}
//!   与传感器级 .../sensors/{sensorMac}/{measurements,stats,outliers}

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

const SENSOR: &str = "/networks/:network_code/gateways/:gateway_mac/sensors/:sensor_mac";

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/auth", post(login))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:username", get(get_user).delete(delete_user))
        .route("/networks", get(list_networks).post(create_network))
        .route(
            "/networks/:network_code",
            get(get_network).patch(update_network).delete(delete_network),
        )
        .route(
            "/networks/:network_code/measurements",
            get(get_network_measurements),
        )
        .route("/networks/:network_code/stats", get(get_network_stats))
        .route("/networks/:network_code/outliers", get(get_network_outliers))
        .route(
            "/networks/:network_code/gateways",
            get(list_gateways).post(create_gateway),
        )
        .route(
            "/networks/:network_code/gateways/:gateway_mac",
            get(get_gateway).patch(update_gateway).delete(delete_gateway),
        )
        .route(
            "/networks/:network_code/gateways/:gateway_mac/sensors",
            get(list_sensors).post(create_sensor),
        )
        .route(
            SENSOR,
            get(get_sensor).patch(update_sensor).delete(delete_sensor),
        )
        .route(
            &format!("{SENSOR}/measurements"),
            get(get_sensor_measurements).post(store_measurements),
        )
        .route(&format!("{SENSOR}/stats"), get(get_sensor_stats))
        .route(&format!("{SENSOR}/outliers"), get(get_sensor_outliers))
}
