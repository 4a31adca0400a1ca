//! 用户仓储（独立于层级之外）。
//!
//! 口令由调用方事先处理（哈希），仓储只负责唯一性与存在性。

use crate::error::HierarchyError;
use iot_storage::{Stores, UserRecord};

#[derive(Clone)]
pub struct UserRepository {
    stores: Stores,
}

impl UserRepository {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, HierarchyError> {
        Ok(self.stores.users.list_users().await?)
    }

    pub async fn get_user(&self, username: &str) -> Result<UserRecord, HierarchyError> {
        self.stores
            .users
            .find_user(username)
            .await?
            .ok_or_else(|| HierarchyError::not_found(format!("user {username}")))
    }

    pub async fn create_user(&self, record: UserRecord) -> Result<UserRecord, HierarchyError> {
        if self.stores.users.find_user(&record.username).await?.is_some() {
            return Err(HierarchyError::conflict(format!("user {}", record.username)));
        }
        let created = self.stores.users.insert_user(record).await?;
        tracing::debug!(username = %created.username, user_type = %created.user_type, "user created");
        Ok(created)
    }

    /// 用户不存在时创建，已存在时保持不变；返回是否新建。
    pub async fn ensure_user(&self, record: UserRecord) -> Result<bool, HierarchyError> {
        match self.create_user(record).await {
            Ok(_) => Ok(true),
            Err(HierarchyError::Conflict(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), HierarchyError> {
        let affected = self.stores.users.delete_user(username).await?;
        if affected == 0 {
            return Err(HierarchyError::not_found(format!("user {username}")));
        }
        tracing::debug!(username, "user deleted");
        Ok(())
    }
}
