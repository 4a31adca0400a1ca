//! 传感器仓储。

use crate::error::HierarchyError;
use crate::identity::ensure_device_mac_available;
use crate::scope::{require_gateway, require_sensor};
use iot_storage::{SensorRecord, SensorUpdate, Stores};

#[derive(Clone)]
pub struct SensorRepository {
    stores: Stores,
}

impl SensorRepository {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list_sensors(
        &self,
        network_code: &str,
        gateway_mac: &str,
    ) -> Result<Vec<SensorRecord>, HierarchyError> {
        require_gateway(&self.stores, network_code, gateway_mac).await?;
        Ok(self
            .stores
            .sensors
            .list_sensors(network_code, gateway_mac)
            .await?)
    }

    pub async fn get_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<SensorRecord, HierarchyError> {
        require_sensor(&self.stores, network_code, gateway_mac, mac).await
    }

    /// 在网关下创建传感器，所属网关以路径为准。
    pub async fn create_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mut record: SensorRecord,
    ) -> Result<SensorRecord, HierarchyError> {
        require_gateway(&self.stores, network_code, gateway_mac).await?;
        ensure_device_mac_available(&self.stores, &record.mac).await?;
        record.gateway_mac = gateway_mac.to_string();
        let created = self.stores.sensors.insert_sensor(record).await?;
        tracing::debug!(
            network = %network_code,
            gateway = %gateway_mac,
            sensor = %created.mac,
            "sensor created"
        );
        Ok(created)
    }

    /// 部分更新；mac 改名由存储层级联到测量值。
    pub async fn update_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
        update: SensorUpdate,
    ) -> Result<(), HierarchyError> {
        require_sensor(&self.stores, network_code, gateway_mac, mac).await?;
        if let Some(new_mac) = update.mac.as_deref().filter(|new_mac| *new_mac != mac) {
            ensure_device_mac_available(&self.stores, new_mac).await?;
        }
        let affected = self
            .stores
            .sensors
            .update_sensor(network_code, gateway_mac, mac, &update)
            .await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!(
                "sensor {mac} in gateway {gateway_mac}"
            )));
        }
        tracing::debug!(sensor = %mac, renamed_to = ?update.mac, "sensor updated");
        Ok(())
    }

    pub async fn delete_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<(), HierarchyError> {
        let affected = self
            .stores
            .sensors
            .delete_sensor(network_code, gateway_mac, mac)
            .await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!(
                "sensor {mac} in gateway {gateway_mac}"
            )));
        }
        tracing::debug!(sensor = %mac, "sensor deleted");
        Ok(())
    }
}
