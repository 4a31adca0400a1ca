//! 网络内存存储实现

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::{NetworkRecord, NetworkUpdate};
use crate::traits::NetworkStore;

#[async_trait::async_trait]
impl NetworkStore for InMemoryStore {
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, StorageError> {
        Ok(self.read()?.networks.values().cloned().collect())
    }

    async fn find_network(&self, code: &str) -> Result<Option<NetworkRecord>, StorageError> {
        Ok(self.read()?.networks.get(code).cloned())
    }

    async fn insert_network(&self, record: NetworkRecord) -> Result<NetworkRecord, StorageError> {
        let mut tables = self.write()?;
        if tables.networks.contains_key(&record.code) {
            return Err(StorageError::conflict("network"));
        }
        tables.networks.insert(record.code.clone(), record.clone());
        Ok(record)
    }

    async fn update_network(
        &self,
        code: &str,
        update: &NetworkUpdate,
    ) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        let Some(mut network) = tables.networks.get(code).cloned() else {
            return Ok(0);
        };
        update.apply(&mut network);
        if network.code != code {
            if tables.networks.contains_key(&network.code) {
                return Err(StorageError::conflict("network"));
            }
            tables.networks.remove(code);
            for gateway in tables.gateways.values_mut() {
                if gateway.network_code == code {
                    gateway.network_code = network.code.clone();
                }
            }
        }
        tables.networks.insert(network.code.clone(), network);
        Ok(1)
    }

    async fn delete_network(&self, code: &str) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        if tables.networks.remove(code).is_none() {
            return Ok(0);
        }
        let gateway_macs: Vec<String> = tables
            .gateways
            .values()
            .filter(|gateway| gateway.network_code == code)
            .map(|gateway| gateway.mac.clone())
            .collect();
        tables.remove_gateways(&gateway_macs);
        Ok(1)
    }
}
