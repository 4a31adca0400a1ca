//! 测量值聚合
//!
//! 输入：已按作用域和时间窗过滤的原始测量值 + 目标传感器 mac 列表。
//! 输出：每个目标传感器一条结果，顺序与目标列表一致。
//!
//! 规则：
//! - 无数据的传感器输出最小记录（只有 mac，没有 stats 和 measurements）
//! - 有数据时先算统计量，再按模式输出测量值明细
//! - 目标列表为空时返回空列表
//! - 过滤后没有剩余测量值时省略 measurements（不输出空数组）

use crate::stats::{Stats, compute_stats};
use chrono::{DateTime, Utc};
use domain::{Measurement, TimeWindow};
use std::collections::HashMap;

/// 聚合输出模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMode {
    /// 全部测量值，逐条标注是否异常
    Measurements,
    /// 只保留异常值
    Outliers,
    /// 只输出统计量
    StatsOnly,
}

/// 标注过异常状态的测量值。
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedMeasurement {
    pub created_at: DateTime<Utc>,
    pub value: f64,
    pub is_outlier: bool,
}

/// 单个传感器的聚合结果。
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMeasurements {
    pub sensor_mac: String,
    pub stats: Option<Stats>,
    pub measurements: Option<Vec<FlaggedMeasurement>>,
}

impl SensorMeasurements {
    /// 最小记录：只有传感器 mac。
    pub fn minimal(sensor_mac: impl Into<String>) -> Self {
        Self {
            sensor_mac: sensor_mac.into(),
            stats: None,
            measurements: None,
        }
    }

    pub fn is_minimal(&self) -> bool {
        self.stats.is_none() && self.measurements.is_none()
    }
}

/// 按传感器聚合测量值。
pub fn aggregate(
    records: &[Measurement],
    sensor_macs: &[String],
    window: &TimeWindow,
    mode: AggregateMode,
) -> Vec<SensorMeasurements> {
    let mut groups: HashMap<&str, Vec<&Measurement>> = HashMap::new();
    for record in records {
        groups
            .entry(record.sensor_mac.as_str())
            .or_default()
            .push(record);
    }

    sensor_macs
        .iter()
        .map(|mac| match groups.get(mac.as_str()) {
            Some(group) if !group.is_empty() => summarize(mac, group, window, mode),
            _ => SensorMeasurements::minimal(mac.clone()),
        })
        .collect()
}

fn summarize(
    sensor_mac: &str,
    group: &[&Measurement],
    window: &TimeWindow,
    mode: AggregateMode,
) -> SensorMeasurements {
    let values: Vec<f64> = group.iter().map(|record| record.value).collect();
    let stats = compute_stats(&values).with_window(window);

    let measurements = match mode {
        AggregateMode::StatsOnly => None,
        AggregateMode::Measurements | AggregateMode::Outliers => {
            let outliers_only = mode == AggregateMode::Outliers;
            let flagged: Vec<FlaggedMeasurement> = group
                .iter()
                .map(|record| FlaggedMeasurement {
                    created_at: record.created_at,
                    value: record.value,
                    is_outlier: stats.is_outlier(record.value),
                })
                .filter(|item| !outliers_only || item.is_outlier)
                .collect();
            (!flagged.is_empty()).then_some(flagged)
        }
    };

    SensorMeasurements {
        sensor_mac: sensor_mac.to_string(),
        stats: Some(stats),
        measurements,
    }
}
