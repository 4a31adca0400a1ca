//! 网络仓储。

use crate::error::HierarchyError;
use crate::gateway::GatewayTree;
use crate::scope::require_network;
use iot_storage::{NetworkRecord, NetworkUpdate, Stores};

/// 网络及其下属网关（含传感器）的树形视图。
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkTree {
    pub network: NetworkRecord,
    pub gateways: Vec<GatewayTree>,
}

#[derive(Clone)]
pub struct NetworkRepository {
    stores: Stores,
}

impl NetworkRepository {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// 列出全部网络，附带网关与传感器。
    pub async fn list_networks(&self) -> Result<Vec<NetworkTree>, HierarchyError> {
        let networks = self.stores.networks.list_networks().await?;
        let mut trees = Vec::with_capacity(networks.len());
        for network in networks {
            trees.push(self.expand(network).await?);
        }
        Ok(trees)
    }

    pub async fn get_network(&self, code: &str) -> Result<NetworkTree, HierarchyError> {
        let network = require_network(&self.stores, code).await?;
        self.expand(network).await
    }

    pub async fn create_network(
        &self,
        record: NetworkRecord,
    ) -> Result<NetworkRecord, HierarchyError> {
        if self.stores.networks.find_network(&record.code).await?.is_some() {
            return Err(HierarchyError::conflict(format!("network {}", record.code)));
        }
        let created = self.stores.networks.insert_network(record).await?;
        tracing::debug!(network = %created.code, "network created");
        Ok(created)
    }

    /// 部分更新；code 改名由存储层级联到下属网关。
    pub async fn update_network(
        &self,
        code: &str,
        update: NetworkUpdate,
    ) -> Result<(), HierarchyError> {
        if let Some(new_code) = update.code.as_deref().filter(|new_code| *new_code != code) {
            if self.stores.networks.find_network(new_code).await?.is_some() {
                return Err(HierarchyError::conflict(format!("network {new_code}")));
            }
        }
        let affected = self.stores.networks.update_network(code, &update).await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!("network {code}")));
        }
        tracing::debug!(network = %code, renamed_to = ?update.code, "network updated");
        Ok(())
    }

    pub async fn delete_network(&self, code: &str) -> Result<(), HierarchyError> {
        let affected = self.stores.networks.delete_network(code).await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!("network {code}")));
        }
        tracing::debug!(network = %code, "network deleted");
        Ok(())
    }

    async fn expand(&self, network: NetworkRecord) -> Result<NetworkTree, HierarchyError> {
        let gateways = self.stores.gateways.list_gateways(&network.code).await?;
        let mut children = Vec::with_capacity(gateways.len());
        for gateway in gateways {
            let sensors = self
                .stores
                .sensors
                .list_sensors(&network.code, &gateway.mac)
                .await?;
            children.push(GatewayTree { gateway, sensors });
        }
        Ok(NetworkTree {
            network,
            gateways: children,
        })
    }
}
