//! # 层级仓储
//!
//! network → gateway → sensor → measurement 四级资源的一致性规则：
//!
//! - **创建**：先校验父级存在（NotFound），再校验标识唯一（Conflict）；
//!   网关与传感器的 mac 在两类设备的并集内全局唯一
//! - **部分更新**：未设置的字段保持原值；标识变化时重跑唯一性校验；
//!   按旧标识 + 完整祖先路径条件更新，0 行视为 NotFound
//! - **删除**：按标识 + 完整祖先路径删除，存储层级联删除全部后代
//! - **作用域读取**：祖先路径逐级校验，缺失即 NotFound，不会静默返回空集合
//!
//! 仓储只持有注入的 [`Stores`](iot_storage::Stores)，不持有锁，也不接收角色参数；
//! 检查后写入之间的竞态由存储层的主键约束兜底。

pub mod error;
pub mod gateway;
pub mod identity;
pub mod measurement;
pub mod network;
pub mod sensor;
pub mod user;

mod scope;

pub use error::HierarchyError;
pub use gateway::{GatewayRepository, GatewayTree};
pub use identity::ensure_device_mac_available;
pub use measurement::{MeasurementRepository, Reading};
pub use network::{NetworkRepository, NetworkTree};
pub use sensor::SensorRepository;
pub use user::UserRepository;

use iot_storage::Stores;

/// 全部仓储的集合，进程启动时构造一次。
#[derive(Clone)]
pub struct Repositories {
    pub networks: NetworkRepository,
    pub gateways: GatewayRepository,
    pub sensors: SensorRepository,
    pub measurements: MeasurementRepository,
    pub users: UserRepository,
}

impl Repositories {
    pub fn new(stores: Stores) -> Self {
        Self {
            networks: NetworkRepository::new(stores.clone()),
            gateways: GatewayRepository::new(stores.clone()),
            sensors: SensorRepository::new(stores.clone()),
            measurements: MeasurementRepository::new(stores.clone()),
            users: UserRepository::new(stores),
        }
    }
}
