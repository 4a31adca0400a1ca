//! Postgres 网络存储实现
//!
//! 通过 SQL 查询实现网络 CRUD 操作。
//!
//! 设计要点：
//! - code 改名由 `gateways.network_code` 外键级联
//! - 删除由外键级联到网关、传感器、测量值

use crate::error::StorageError;
use crate::models::{NetworkRecord, NetworkUpdate};
use crate::traits::NetworkStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgNetworkStore {
    pub pool: PgPool,
}

impl PgNetworkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn network_from_row(row: &PgRow) -> Result<NetworkRecord, sqlx::Error> {
    Ok(NetworkRecord {
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

#[async_trait::async_trait]
impl NetworkStore for PgNetworkStore {
    /// 列出所有网络
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>, StorageError> {
        let rows = sqlx::query("select code, name, description from networks order by code")
            .fetch_all(&self.pool)
            .await?;
        let mut networks = Vec::with_capacity(rows.len());
        for row in rows {
            networks.push(network_from_row(&row)?);
        }
        Ok(networks)
    }

    /// 查找指定网络
    async fn find_network(&self, code: &str) -> Result<Option<NetworkRecord>, StorageError> {
        let row = sqlx::query("select code, name, description from networks where code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(network_from_row(&row)?))
    }

    /// 创建新网络
    async fn insert_network(&self, record: NetworkRecord) -> Result<NetworkRecord, StorageError> {
        sqlx::query("insert into networks (code, name, description) values ($1, $2, $3)")
            .bind(&record.code)
            .bind(&record.name)
            .bind(&record.description)
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    /// 更新网络
    async fn update_network(
        &self,
        code: &str,
        update: &NetworkUpdate,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "update networks set \
             code = coalesce($1, code), \
             name = coalesce($2, name), \
             description = coalesce($3, description) \
             where code = $4",
        )
        .bind(&update.code)
        .bind(&update.name)
        .bind(&update.description)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// 删除网络
    async fn delete_network(&self, code: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("delete from networks where code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
