//! 内存存储实现模块
//!
//! 用于本地演示和测试。
//!
//! 所有集合放在同一把 `RwLock` 之下，删除与改名的级联在一次写锁内完成，
//! 等价于数据库的 `ON DELETE CASCADE` / `ON UPDATE CASCADE`。
//!
//! 包含以下实现（均由 [`InMemoryStore`] 提供）：
//! - NetworkStore
//! - GatewayStore
//! - SensorStore
//! - MeasurementStore
//! - UserStore

pub mod gateway;
pub mod measurement;
pub mod network;
pub mod sensor;
pub mod user;

use crate::error::StorageError;
use crate::models::{
    GatewayRecord, MeasurementRecord, NetworkRecord, SensorRecord, UserRecord,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 内存表集合。
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) networks: BTreeMap<String, NetworkRecord>,
    pub(crate) gateways: BTreeMap<String, GatewayRecord>,
    pub(crate) sensors: BTreeMap<String, SensorRecord>,
    pub(crate) measurements: Vec<MeasurementRecord>,
    pub(crate) next_measurement_id: i64,
    pub(crate) users: BTreeMap<String, UserRecord>,
}

impl Tables {
    /// 网关是否属于指定网络。
    pub(crate) fn gateway_in_network(&self, network_code: &str, gateway_mac: &str) -> bool {
        self.gateways
            .get(gateway_mac)
            .map(|gateway| gateway.network_code == network_code)
            .unwrap_or(false)
    }

    /// 传感器是否位于指定祖先路径下。
    pub(crate) fn sensor_in_path(&self, network_code: &str, gateway_mac: &str, mac: &str) -> bool {
        self.gateway_in_network(network_code, gateway_mac)
            && self
                .sensors
                .get(mac)
                .map(|sensor| sensor.gateway_mac == gateway_mac)
                .unwrap_or(false)
    }

    /// mac 是否已被任一设备（网关或传感器）占用。
    pub(crate) fn device_mac_taken(&self, mac: &str) -> bool {
        self.gateways.contains_key(mac) || self.sensors.contains_key(mac)
    }

    /// 删除传感器及其测量值。
    pub(crate) fn remove_sensors(&mut self, macs: &[String]) {
        for mac in macs {
            self.sensors.remove(mac);
        }
        self.measurements
            .retain(|item| !macs.iter().any(|mac| mac == &item.sensor_mac));
    }

    /// 删除网关及其全部后代。
    pub(crate) fn remove_gateways(&mut self, macs: &[String]) {
        let sensor_macs: Vec<String> = self
            .sensors
            .values()
            .filter(|sensor| macs.iter().any(|mac| mac == &sensor.gateway_mac))
            .map(|sensor| sensor.mac.clone())
            .collect();
        self.remove_sensors(&sensor_macs);
        for mac in macs {
            self.gateways.remove(mac);
        }
    }
}

/// 内存存储
///
/// 使用 RwLock + BTreeMap 提供线程安全的内存存储，列表结果按主键有序。
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::new("lock failed"))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))
    }
}
