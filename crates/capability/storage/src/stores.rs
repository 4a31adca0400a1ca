//! 存储集合
//!
//! 把五类存储以 `Arc<dyn Trait>` 形式打包，供上层仓储与 HTTP 层共享。
//! 内存后端下五个字段指向同一个 [`InMemoryStore`]，级联在一把锁内完成。

use crate::in_memory::InMemoryStore;
use crate::postgres::{
    PgGatewayStore, PgMeasurementStore, PgNetworkStore, PgSensorStore, PgUserStore,
};
use crate::traits::{GatewayStore, MeasurementStore, NetworkStore, SensorStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Stores {
    pub networks: Arc<dyn NetworkStore>,
    pub gateways: Arc<dyn GatewayStore>,
    pub sensors: Arc<dyn SensorStore>,
    pub measurements: Arc<dyn MeasurementStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// 空的内存存储
    pub fn in_memory() -> Self {
        Self::from_in_memory(Arc::new(InMemoryStore::new()))
    }

    /// 共享同一个内存存储实例
    pub fn from_in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            networks: store.clone(),
            gateways: store.clone(),
            sensors: store.clone(),
            measurements: store.clone(),
            users: store,
        }
    }

    /// Postgres 存储（共享连接池）
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            networks: Arc::new(PgNetworkStore::new(pool.clone())),
            gateways: Arc::new(PgGatewayStore::new(pool.clone())),
            sensors: Arc::new(PgSensorStore::new(pool.clone())),
            measurements: Arc::new(PgMeasurementStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool)),
        }
    }
}
