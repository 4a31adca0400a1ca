//! 层级仓储错误。

use iot_storage::StorageError;

/// 仓储错误：两类领域错误 + 后端故障。
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// 按标识或祖先路径查找的实体不存在
    #[error("{0} not found")]
    NotFound(String),
    /// 标识冲突（集合内重复或跨设备类型重复）
    #[error("{0} already exists")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl HierarchyError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }
}

impl From<StorageError> for HierarchyError {
    fn from(err: StorageError) -> Self {
        // 主键冲突意味着检查与写入之间发生了竞态
        if err.is_conflict() {
            return Self::Conflict(err.message().to_string());
        }
        Self::Storage(err)
    }
}
