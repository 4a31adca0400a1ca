//! 网关内存存储实现
//!
//! 功能：
//! - 网关 CRUD 操作
//! - 网络级资源过滤
//! - mac 改名级联到传感器，删除级联到传感器与测量值

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::{GatewayRecord, GatewayUpdate};
use crate::traits::GatewayStore;

#[async_trait::async_trait]
impl GatewayStore for InMemoryStore {
    /// 列出指定网络下的网关
    async fn list_gateways(&self, network_code: &str) -> Result<Vec<GatewayRecord>, StorageError> {
        let items = self
            .read()?
            .gateways
            .values()
            .filter(|item| item.network_code == network_code)
            .cloned()
            .collect();
        Ok(items)
    }

    /// 在指定网络内查找网关
    async fn find_gateway(
        &self,
        network_code: &str,
        mac: &str,
    ) -> Result<Option<GatewayRecord>, StorageError> {
        let item = self
            .read()?
            .gateways
            .get(mac)
            .filter(|item| item.network_code == network_code)
            .cloned();
        Ok(item)
    }

    async fn find_gateway_by_mac(&self, mac: &str) -> Result<Option<GatewayRecord>, StorageError> {
        Ok(self.read()?.gateways.get(mac).cloned())
    }

    /// 插入网关
    ///
    /// mac 与任一网关或传感器重复时返回冲突。
    async fn insert_gateway(&self, record: GatewayRecord) -> Result<GatewayRecord, StorageError> {
        let mut tables = self.write()?;
        if !tables.networks.contains_key(&record.network_code) {
            return Err(StorageError::new("network missing"));
        }
        if tables.device_mac_taken(&record.mac) {
            return Err(StorageError::conflict("device mac"));
        }
        tables.gateways.insert(record.mac.clone(), record.clone());
        Ok(record)
    }

    /// 更新网关
    async fn update_gateway(
        &self,
        network_code: &str,
        mac: &str,
        update: &GatewayUpdate,
    ) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        let Some(mut gateway) = tables
            .gateways
            .get(mac)
            .filter(|item| item.network_code == network_code)
            .cloned()
        else {
            return Ok(0);
        };
        update.apply(&mut gateway);
        if gateway.mac != mac {
            if tables.device_mac_taken(&gateway.mac) {
                return Err(StorageError::conflict("device mac"));
            }
            tables.gateways.remove(mac);
            for sensor in tables.sensors.values_mut() {
                if sensor.gateway_mac == mac {
                    sensor.gateway_mac = gateway.mac.clone();
                }
            }
        }
        tables.gateways.insert(gateway.mac.clone(), gateway);
        Ok(1)
    }

    /// 删除网关
    async fn delete_gateway(&self, network_code: &str, mac: &str) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        if !tables.gateway_in_network(network_code, mac) {
            return Ok(0);
        }
        tables.remove_gateways(&[mac.to_string()]);
        Ok(1)
    }
}
