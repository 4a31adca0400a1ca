//! 测量值内存存储实现

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::{MeasurementRecord, NewMeasurement};
use crate::traits::MeasurementStore;
use domain::TimeWindow;

impl InMemoryStore {
    /// 当前累计的测量值数量（用于测试）
    pub fn measurement_count(&self) -> usize {
        self.read().map(|tables| tables.measurements.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl MeasurementStore for InMemoryStore {
    async fn insert_measurement(
        &self,
        value: NewMeasurement,
    ) -> Result<MeasurementRecord, StorageError> {
        let mut tables = self.write()?;
        if !tables.sensors.contains_key(&value.sensor_mac) {
            return Err(StorageError::new("sensor missing"));
        }
        tables.next_measurement_id += 1;
        let record = MeasurementRecord {
            id: tables.next_measurement_id,
            sensor_mac: value.sensor_mac,
            created_at: value.created_at,
            value: value.value,
        };
        tables.measurements.push(record.clone());
        Ok(record)
    }

    async fn list_measurements(
        &self,
        sensor_macs: &[String],
        window: &TimeWindow,
    ) -> Result<Vec<MeasurementRecord>, StorageError> {
        let tables = self.read()?;
        let mut selected: Vec<MeasurementRecord> = tables
            .measurements
            .iter()
            .filter(|item| sensor_macs.contains(&item.sensor_mac))
            .filter(|item| window.contains(&item.created_at))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(selected)
    }
}
