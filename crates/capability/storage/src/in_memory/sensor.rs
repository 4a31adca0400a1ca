//! 传感器内存存储实现
//!
//! 功能：
//! - 传感器 CRUD 操作（按 network → gateway → sensor 完整路径匹配）
//! - 网络内 mac 解析
//! - mac 改名与删除级联到测量值

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::{SensorRecord, SensorUpdate};
use crate::traits::SensorStore;

#[async_trait::async_trait]
impl SensorStore for InMemoryStore {
    async fn list_sensors(
        &self,
        network_code: &str,
        gateway_mac: &str,
    ) -> Result<Vec<SensorRecord>, StorageError> {
        let tables = self.read()?;
        if !tables.gateway_in_network(network_code, gateway_mac) {
            return Ok(Vec::new());
        }
        let items = tables
            .sensors
            .values()
            .filter(|item| item.gateway_mac == gateway_mac)
            .cloned()
            .collect();
        Ok(items)
    }

    async fn find_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<Option<SensorRecord>, StorageError> {
        let tables = self.read()?;
        if !tables.sensor_in_path(network_code, gateway_mac, mac) {
            return Ok(None);
        }
        Ok(tables.sensors.get(mac).cloned())
    }

    async fn find_sensor_by_mac(&self, mac: &str) -> Result<Option<SensorRecord>, StorageError> {
        Ok(self.read()?.sensors.get(mac).cloned())
    }

    async fn list_sensor_macs(
        &self,
        network_code: &str,
        only: Option<&[String]>,
    ) -> Result<Vec<String>, StorageError> {
        let tables = self.read()?;
        let macs = tables
            .sensors
            .values()
            .filter(|sensor| tables.gateway_in_network(network_code, &sensor.gateway_mac))
            .filter(|sensor| only.map_or(true, |set| set.contains(&sensor.mac)))
            .map(|sensor| sensor.mac.clone())
            .collect();
        Ok(macs)
    }

    /// 插入传感器
    ///
    /// mac 与任一网关或传感器重复时返回冲突。
    async fn insert_sensor(&self, record: SensorRecord) -> Result<SensorRecord, StorageError> {
        let mut tables = self.write()?;
        if !tables.gateways.contains_key(&record.gateway_mac) {
            return Err(StorageError::new("gateway missing"));
        }
        if tables.device_mac_taken(&record.mac) {
            return Err(StorageError::conflict("device mac"));
        }
        tables.sensors.insert(record.mac.clone(), record.clone());
        Ok(record)
    }

    async fn update_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
        update: &SensorUpdate,
    ) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        if !tables.sensor_in_path(network_code, gateway_mac, mac) {
            return Ok(0);
        }
        let Some(mut sensor) = tables.sensors.get(mac).cloned() else {
            return Ok(0);
        };
        update.apply(&mut sensor);
        if sensor.mac != mac {
            if tables.device_mac_taken(&sensor.mac) {
                return Err(StorageError::conflict("device mac"));
            }
            tables.sensors.remove(mac);
            for measurement in tables.measurements.iter_mut() {
                if measurement.sensor_mac == mac {
                    measurement.sensor_mac = sensor.mac.clone();
                }
            }
        }
        tables.sensors.insert(sensor.mac.clone(), sensor);
        Ok(1)
    }

    async fn delete_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        if !tables.sensor_in_path(network_code, gateway_mac, mac) {
            return Ok(0);
        }
        tables.remove_sensors(&[mac.to_string()]);
        Ok(1)
    }
}
