//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 层级模型：NetworkRecord → GatewayRecord → SensorRecord → MeasurementRecord
//! - 用户模型：UserRecord
//!
//! 更新结构中每个字段都是 `Option`：`None` 表示不修改，`Some` 表示改为该值。

use chrono::{DateTime, Utc};
use domain::{Measurement, UserType};

/// 网络记录。
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRecord {
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网络更新输入。
#[derive(Debug, Clone, Default)]
pub struct NetworkUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NetworkUpdate {
    pub fn apply(&self, record: &mut NetworkRecord) {
        if let Some(code) = &self.code {
            record.code = code.clone();
        }
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// 网关记录。
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRecord {
    pub mac: String,
    pub network_code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 网关更新输入（所属网络不可经由更新修改）。
#[derive(Debug, Clone, Default)]
pub struct GatewayUpdate {
    pub mac: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl GatewayUpdate {
    pub fn apply(&self, record: &mut GatewayRecord) {
        if let Some(mac) = &self.mac {
            record.mac = mac.clone();
        }
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// 传感器记录。
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub mac: String,
    pub gateway_mac: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// 被测量名称（如 temperature）
    pub variable: Option<String>,
    pub unit: Option<String>,
}

/// 传感器更新输入。
#[derive(Debug, Clone, Default)]
pub struct SensorUpdate {
    pub mac: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub variable: Option<String>,
    pub unit: Option<String>,
}

impl SensorUpdate {
    pub fn apply(&self, record: &mut SensorRecord) {
        if let Some(mac) = &self.mac {
            record.mac = mac.clone();
        }
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
        if let Some(variable) = &self.variable {
            record.variable = Some(variable.clone());
        }
        if let Some(unit) = &self.unit {
            record.unit = Some(unit.clone());
        }
    }
}

/// 时序测量值记录（id 由存储生成）。
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub id: i64,
    pub sensor_mac: String,
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

impl MeasurementRecord {
    pub fn to_measurement(&self) -> Measurement {
        Measurement {
            sensor_mac: self.sensor_mac.clone(),
            created_at: self.created_at,
            value: self.value,
        }
    }
}

/// 待写入的测量值。
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub sensor_mac: String,
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

/// 用户记录。
///
/// `password` 为 Argon2 哈希，或按明文预置的口令。
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub user_type: UserType,
}
