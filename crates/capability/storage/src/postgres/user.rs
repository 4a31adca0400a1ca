//! Postgres 用户存储实现
//!
//! user_type 以小写文本存储（admin / operator / viewer）。

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::UserType;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    let user_type: String = row.try_get("user_type")?;
    Ok(UserRecord {
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        user_type: user_type.parse::<UserType>().map_err(StorageError::new)?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows = sqlx::query("select username, password, user_type from users order by username")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query("select username, password, user_type from users where username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        sqlx::query("insert into users (username, password, user_type) values ($1, $2, $3)")
            .bind(&record.username)
            .bind(&record.password)
            .bind(record.user_type.as_str())
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn delete_user(&self, username: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("delete from users where username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
