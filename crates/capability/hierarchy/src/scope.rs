//! 祖先路径校验：每一级独立解析，缺失即 NotFound。

use crate::error::HierarchyError;
use iot_storage::{GatewayRecord, NetworkRecord, SensorRecord, Stores};

pub(crate) async fn require_network(
    stores: &Stores,
    network_code: &str,
) -> Result<NetworkRecord, HierarchyError> {
    stores
        .networks
        .find_network(network_code)
        .await?
        .ok_or_else(|| HierarchyError::not_found(format!("network {network_code}")))
}

pub(crate) async fn require_gateway(
    stores: &Stores,
    network_code: &str,
    gateway_mac: &str,
) -> Result<GatewayRecord, HierarchyError> {
    require_network(stores, network_code).await?;
    stores
        .gateways
        .find_gateway(network_code, gateway_mac)
        .await?
        .ok_or_else(|| {
            HierarchyError::not_found(format!("gateway {gateway_mac} in network {network_code}"))
        })
}

pub(crate) async fn require_sensor(
    stores: &Stores,
    network_code: &str,
    gateway_mac: &str,
    sensor_mac: &str,
) -> Result<SensorRecord, HierarchyError> {
    require_gateway(stores, network_code, gateway_mac).await?;
    stores
        .sensors
        .find_sensor(network_code, gateway_mac, sensor_mac)
        .await?
        .ok_or_else(|| {
            HierarchyError::not_found(format!("sensor {sensor_mac} in gateway {gateway_mac}"))
        })
}
