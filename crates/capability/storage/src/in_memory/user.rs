//! 用户内存存储实现
//!
//! 功能：
//! - 内置 admin 账户（用户名：admin，口令以明文预置）
//! - 用户增删查

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::UserType;

impl InMemoryStore {
    /// 内置 admin 账户
    ///
    /// 创建包含默认 admin 用户的存储。
    pub fn with_default_admin(password: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.write() {
            tables.users.insert(
                "admin".to_string(),
                UserRecord {
                    username: "admin".to_string(),
                    password: password.into(),
                    user_type: UserType::Admin,
                },
            );
        }
        store
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.read()?.users.get(username).cloned())
    }

    async fn insert_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let mut users = self.write()?;
        if users.users.contains_key(&record.username) {
            return Err(StorageError::conflict("user"));
        }
        users.users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    async fn delete_user(&self, username: &str) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        Ok(tables.users.remove(username).map_or(0, |_| 1))
    }
}
