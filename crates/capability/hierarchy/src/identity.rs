//! 设备标识唯一性规则。
//!
//! 网关与传感器共享同一个 mac 命名空间：一个 mac 最多标识一台设备，
//! 不论设备类型，也不论所属网络。

use crate::error::HierarchyError;
use iot_storage::Stores;

/// 确认 mac 未被任何网关或传感器占用。
pub async fn ensure_device_mac_available(stores: &Stores, mac: &str) -> Result<(), HierarchyError> {
    if stores.gateways.find_gateway_by_mac(mac).await?.is_some() {
        tracing::warn!(mac, "device mac already used by a gateway");
        return Err(HierarchyError::conflict(format!("gateway mac {mac}")));
    }
    if stores.sensors.find_sensor_by_mac(mac).await?.is_some() {
        tracing::warn!(mac, "device mac already used by a sensor");
        return Err(HierarchyError::conflict(format!("sensor mac {mac}")));
    }
    Ok(())
}
