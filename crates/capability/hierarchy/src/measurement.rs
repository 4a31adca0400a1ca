//! 测量值仓储：批量写入与按传感器/网络的聚合查询。

use crate::error::HierarchyError;
use crate::scope::{require_network, require_sensor};
use chrono::{DateTime, Utc};
use domain::{Measurement, TimeWindow};
use iot_stats::{AggregateMode, SensorMeasurements, Stats, aggregate};
use iot_storage::{NewMeasurement, Stores};
use std::collections::HashSet;

/// 待写入的一条读数（所属传感器由路径给出）。
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

#[derive(Clone)]
pub struct MeasurementRepository {
    stores: Stores,
}

impl MeasurementRepository {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// 批量写入传感器读数。
    ///
    /// 路径校验失败直接返回 NotFound；之后逐条按顺序写入，单条失败不影响后续条目。
    /// 全部尝试完成后，若有失败则返回第一个错误，否则返回写入条数。
    pub async fn store_measurements(
        &self,
        network_code: &str,
        gateway_mac: &str,
        sensor_mac: &str,
        readings: Vec<Reading>,
    ) -> Result<usize, HierarchyError> {
        require_sensor(&self.stores, network_code, gateway_mac, sensor_mac).await?;

        let total = readings.len();
        let mut stored = 0usize;
        let mut first_error: Option<HierarchyError> = None;
        for (index, reading) in readings.into_iter().enumerate() {
            let item = NewMeasurement {
                sensor_mac: sensor_mac.to_string(),
                created_at: reading.created_at,
                value: reading.value,
            };
            match self.stores.measurements.insert_measurement(item).await {
                Ok(_) => {
                    stored += 1;
                    iot_telemetry::record_measurement_written();
                }
                Err(err) => {
                    iot_telemetry::record_measurement_failed();
                    tracing::warn!(sensor = %sensor_mac, index, error = %err, "measurement write failed");
                    if first_error.is_none() {
                        first_error = Some(err.into());
                    }
                }
            }
        }

        if let Some(err) = first_error {
            tracing::warn!(
                sensor = %sensor_mac,
                total,
                failed = total - stored,
                "measurement batch partially failed"
            );
            return Err(err);
        }
        tracing::debug!(sensor = %sensor_mac, stored, "measurements stored");
        Ok(stored)
    }

    /// 解析网络内的传感器 mac。
    ///
    /// 未给出列表时返回网络内全部传感器；给出列表时只保留存在且属于该网络的 mac，
    /// 保持调用方顺序并去重，无效 mac 静默丢弃。
    pub async fn resolve_sensor_macs(
        &self,
        network_code: &str,
        requested: Option<&[String]>,
    ) -> Result<Vec<String>, HierarchyError> {
        require_network(&self.stores, network_code).await?;
        if requested.is_some_and(|macs| macs.is_empty()) {
            return Ok(Vec::new());
        }
        let found = self
            .stores
            .sensors
            .list_sensor_macs(network_code, requested)
            .await?;
        let Some(requested) = requested else {
            return Ok(found);
        };
        let found: HashSet<String> = found.into_iter().collect();
        let mut seen: HashSet<&str> = HashSet::new();
        Ok(requested
            .iter()
            .filter(|mac| found.contains(mac.as_str()) && seen.insert(mac.as_str()))
            .cloned()
            .collect())
    }

    pub async fn get_measurements_by_network(
        &self,
        network_code: &str,
        sensor_macs: Option<&[String]>,
        window: &TimeWindow,
    ) -> Result<Vec<SensorMeasurements>, HierarchyError> {
        self.query_network(network_code, sensor_macs, window, AggregateMode::Measurements)
            .await
    }

    pub async fn get_stats_by_network(
        &self,
        network_code: &str,
        sensor_macs: Option<&[String]>,
        window: &TimeWindow,
    ) -> Result<Vec<SensorMeasurements>, HierarchyError> {
        self.query_network(network_code, sensor_macs, window, AggregateMode::StatsOnly)
            .await
    }

    pub async fn get_outliers_by_network(
        &self,
        network_code: &str,
        sensor_macs: Option<&[String]>,
        window: &TimeWindow,
    ) -> Result<Vec<SensorMeasurements>, HierarchyError> {
        self.query_network(network_code, sensor_macs, window, AggregateMode::Outliers)
            .await
    }

    pub async fn get_measurements_by_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        sensor_mac: &str,
        window: &TimeWindow,
    ) -> Result<SensorMeasurements, HierarchyError> {
        self.query_sensor(
            network_code,
            gateway_mac,
            sensor_mac,
            window,
            AggregateMode::Measurements,
        )
        .await
    }

    pub async fn get_outliers_by_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        sensor_mac: &str,
        window: &TimeWindow,
    ) -> Result<SensorMeasurements, HierarchyError> {
        self.query_sensor(
            network_code,
            gateway_mac,
            sensor_mac,
            window,
            AggregateMode::Outliers,
        )
        .await
    }

    /// 单个传感器的统计量；无数据时返回全零统计量。
    pub async fn get_stats_by_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        sensor_mac: &str,
        window: &TimeWindow,
    ) -> Result<Stats, HierarchyError> {
        let result = self
            .query_sensor(
                network_code,
                gateway_mac,
                sensor_mac,
                window,
                AggregateMode::StatsOnly,
            )
            .await?;
        Ok(result
            .stats
            .unwrap_or_else(|| Stats::zeroed().with_window(window)))
    }

    async fn query_network(
        &self,
        network_code: &str,
        sensor_macs: Option<&[String]>,
        window: &TimeWindow,
        mode: AggregateMode,
    ) -> Result<Vec<SensorMeasurements>, HierarchyError> {
        let targets = self.resolve_sensor_macs(network_code, sensor_macs).await?;
        // 空集合必须短路：空过滤条件等于不加限制
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        self.load_and_aggregate(&targets, window, mode).await
    }

    async fn query_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        sensor_mac: &str,
        window: &TimeWindow,
        mode: AggregateMode,
    ) -> Result<SensorMeasurements, HierarchyError> {
        let sensor = require_sensor(&self.stores, network_code, gateway_mac, sensor_mac).await?;
        let targets = vec![sensor.mac];
        let mut results = self.load_and_aggregate(&targets, window, mode).await?;
        Ok(results
            .pop()
            .unwrap_or_else(|| SensorMeasurements::minimal(sensor_mac)))
    }

    async fn load_and_aggregate(
        &self,
        targets: &[String],
        window: &TimeWindow,
        mode: AggregateMode,
    ) -> Result<Vec<SensorMeasurements>, HierarchyError> {
        let records = self
            .stores
            .measurements
            .list_measurements(targets, window)
            .await?;
        let measurements: Vec<Measurement> =
            records.iter().map(|record| record.to_measurement()).collect();
        let results = aggregate(&measurements, targets, window, mode);
        record_aggregate_metrics(&results);
        Ok(results)
    }
}

fn record_aggregate_metrics(results: &[SensorMeasurements]) {
    for result in results {
        if result.stats.is_some() {
            iot_telemetry::record_stats_computed();
        }
        if let Some(items) = &result.measurements {
            let outliers = items.iter().filter(|item| item.is_outlier).count();
            iot_telemetry::record_outliers_flagged(outliers as u64);
        }
    }
}
