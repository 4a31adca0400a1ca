//! 存储接口 Trait 定义
//!
//! 定义层级资源与用户的异步存储接口：
//! - NetworkStore：网络存储
//! - GatewayStore：网关存储
//! - SensorStore：传感器存储
//! - MeasurementStore：测量值存储
//! - UserStore：用户存储
//!
//! 设计原则：
//! - 只提供查找/插入/条件更新/条件删除原语，一致性规则由上层仓储负责
//! - 条件更新/删除返回受影响行数，0 表示未匹配
//! - 重命名与删除由存储实现向后代级联
//! - 插入遇到主键冲突返回 `StorageErrorKind::Conflict`
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    GatewayRecord, GatewayUpdate, MeasurementRecord, NetworkRecord, NetworkUpdate,
    NewMeasurement, SensorRecord, SensorUpdate, UserRecord,
};
use async_trait::async_trait;
use domain::TimeWindow;

/// 网络存储接口
#[async_trait]
pub trait NetworkStore: Send + Sync {
    /// 列出所有网络（按 code 排序）
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, StorageError>;

    /// 查找指定网络
    async fn find_network(&self, code: &str) -> Result<Option<NetworkRecord>, StorageError>;

    /// 插入网络
    async fn insert_network(&self, record: NetworkRecord) -> Result<NetworkRecord, StorageError>;

    /// 按 code 部分更新，改名级联到下属网关
    async fn update_network(
        &self,
        code: &str,
        update: &NetworkUpdate,
    ) -> Result<u64, StorageError>;

    /// 按 code 删除，级联删除全部后代
    async fn delete_network(&self, code: &str) -> Result<u64, StorageError>;
}

/// 网关存储接口
#[async_trait]
pub trait GatewayStore: Send + Sync {
    /// 列出指定网络下的网关
    async fn list_gateways(&self, network_code: &str) -> Result<Vec<GatewayRecord>, StorageError>;

    /// 在指定网络内查找网关
    async fn find_gateway(
        &self,
        network_code: &str,
        mac: &str,
    ) -> Result<Option<GatewayRecord>, StorageError>;

    /// 全局按 mac 查找网关（不限网络）
    async fn find_gateway_by_mac(&self, mac: &str) -> Result<Option<GatewayRecord>, StorageError>;

    /// 插入网关
    async fn insert_gateway(&self, record: GatewayRecord) -> Result<GatewayRecord, StorageError>;

    /// 按 (network_code, mac) 部分更新，mac 改名级联到下属传感器
    async fn update_gateway(
        &self,
        network_code: &str,
        mac: &str,
        update: &GatewayUpdate,
    ) -> Result<u64, StorageError>;

    /// 按 (network_code, mac) 删除，级联删除传感器与测量值
    async fn delete_gateway(&self, network_code: &str, mac: &str) -> Result<u64, StorageError>;
}

/// 传感器存储接口
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// 列出指定网关下的传感器（网关须属于该网络）
    async fn list_sensors(
        &self,
        network_code: &str,
        gateway_mac: &str,
    ) -> Result<Vec<SensorRecord>, StorageError>;

    /// 按完整祖先路径查找传感器
    async fn find_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<Option<SensorRecord>, StorageError>;

    /// 全局按 mac 查找传感器（不限网关/网络）
    async fn find_sensor_by_mac(&self, mac: &str) -> Result<Option<SensorRecord>, StorageError>;

    /// 列出网络内的传感器 mac；`only` 非空时只返回集合内的 mac
    async fn list_sensor_macs(
        &self,
        network_code: &str,
        only: Option<&[String]>,
    ) -> Result<Vec<String>, StorageError>;

    /// 插入传感器
    async fn insert_sensor(&self, record: SensorRecord) -> Result<SensorRecord, StorageError>;

    /// 按完整祖先路径部分更新，mac 改名级联到测量值
    async fn update_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
        update: &SensorUpdate,
    ) -> Result<u64, StorageError>;

    /// 按完整祖先路径删除，级联删除测量值
    async fn delete_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<u64, StorageError>;
}

/// 测量值存储接口
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// 写入单条测量值
    async fn insert_measurement(
        &self,
        value: NewMeasurement,
    ) -> Result<MeasurementRecord, StorageError>;

    /// 查询 mac 集合内、时间窗内的测量值，按 created_at 升序
    async fn list_measurements(
        &self,
        sensor_macs: &[String],
        window: &TimeWindow,
    ) -> Result<Vec<MeasurementRecord>, StorageError>;
}

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 列出所有用户
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// 根据用户名查找用户
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 插入用户
    async fn insert_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    /// 删除用户
    async fn delete_user(&self, username: &str) -> Result<u64, StorageError>;
}
