//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - 唯一约束冲突（检查后写入之间的竞态兜底）
//! - SQL 执行错误、连接错误、锁错误

/// 存储错误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// 主键或唯一约束冲突
    Conflict,
    /// 其余后端错误
    Backend,
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Backend,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Conflict,
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == StorageErrorKind::Conflict
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

/// Postgres 唯一约束冲突的 SQLSTATE。
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
                tracing::debug!(error = %db.message(), "unique violation");
                let subject = db.table().map_or("record".to_string(), |table| format!("{table} key"));
                return Self::conflict(subject);
            }
        }
        Self::new(err.to_string())
    }
}
