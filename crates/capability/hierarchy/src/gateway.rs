//! 网关仓储。

use crate::error::HierarchyError;
use crate::identity::ensure_device_mac_available;
use crate::scope::{require_gateway, require_network};
use iot_storage::{GatewayRecord, GatewayUpdate, SensorRecord, Stores};

/// 网关及其下属传感器。
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayTree {
    pub gateway: GatewayRecord,
    pub sensors: Vec<SensorRecord>,
}

#[derive(Clone)]
pub struct GatewayRepository {
    stores: Stores,
}

impl GatewayRepository {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list_gateways(
        &self,
        network_code: &str,
    ) -> Result<Vec<GatewayTree>, HierarchyError> {
        require_network(&self.stores, network_code).await?;
        let gateways = self.stores.gateways.list_gateways(network_code).await?;
        let mut trees = Vec::with_capacity(gateways.len());
        for gateway in gateways {
            trees.push(self.expand(network_code, gateway).await?);
        }
        Ok(trees)
    }

    pub async fn get_gateway(
        &self,
        network_code: &str,
        mac: &str,
    ) -> Result<GatewayTree, HierarchyError> {
        let gateway = require_gateway(&self.stores, network_code, mac).await?;
        self.expand(network_code, gateway).await
    }

    /// 在网络下创建网关，所属网络以路径为准。
    pub async fn create_gateway(
        &self,
        network_code: &str,
        mut record: GatewayRecord,
    ) -> Result<GatewayRecord, HierarchyError> {
        require_network(&self.stores, network_code).await?;
        ensure_device_mac_available(&self.stores, &record.mac).await?;
        record.network_code = network_code.to_string();
        let created = self.stores.gateways.insert_gateway(record).await?;
        tracing::debug!(network = %network_code, gateway = %created.mac, "gateway created");
        Ok(created)
    }

    /// 部分更新；mac 改名由存储层级联到下属传感器。
    pub async fn update_gateway(
        &self,
        network_code: &str,
        mac: &str,
        update: GatewayUpdate,
    ) -> Result<(), HierarchyError> {
        require_gateway(&self.stores, network_code, mac).await?;
        if let Some(new_mac) = update.mac.as_deref().filter(|new_mac| *new_mac != mac) {
            ensure_device_mac_available(&self.stores, new_mac).await?;
        }
        let affected = self
            .stores
            .gateways
            .update_gateway(network_code, mac, &update)
            .await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!(
                "gateway {mac} in network {network_code}"
            )));
        }
        tracing::debug!(network = %network_code, gateway = %mac, renamed_to = ?update.mac, "gateway updated");
        Ok(())
    }

    pub async fn delete_gateway(&self, network_code: &str, mac: &str) -> Result<(), HierarchyError> {
        let affected = self.stores.gateways.delete_gateway(network_code, mac).await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!(
                "gateway {mac} in network {network_code}"
            )));
        }
        tracing::debug!(network = %network_code, gateway = %mac, "gateway deleted");
        Ok(())
    }

    async fn expand(
        &self,
        network_code: &str,
        gateway: GatewayRecord,
    ) -> Result<GatewayTree, HierarchyError> {
        let sensors = self
            .stores
            .sensors
            .list_sensors(network_code, &gateway.mac)
            .await?;
        Ok(GatewayTree { gateway, sensors })
    }
}
