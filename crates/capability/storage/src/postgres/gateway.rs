//! Postgres 网关存储实现
//!
//! 通过 SQL 查询实现网关 CRUD 操作。
//!
//! 设计要点：
//! - 所有作用域内操作都带有 network_code 条件
//! - mac 改名由 `sensors.gateway_mac` 外键级联
//! - 使用参数化 SQL 防止注入

use crate::error::StorageError;
use crate::models::{GatewayRecord, GatewayUpdate};
use crate::traits::GatewayStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgGatewayStore {
    pub pool: PgPool,
}

impl PgGatewayStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn gateway_from_row(row: &PgRow) -> Result<GatewayRecord, sqlx::Error> {
    Ok(GatewayRecord {
        mac: row.try_get("mac")?,
        network_code: row.try_get("network_code")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

#[async_trait::async_trait]
impl GatewayStore for PgGatewayStore {
    /// 列出指定网络的所有网关
    async fn list_gateways(&self, network_code: &str) -> Result<Vec<GatewayRecord>, StorageError> {
        let rows = sqlx::query(
            "select mac, network_code, name, description \
             from gateways where network_code = $1 order by mac",
        )
        .bind(network_code)
        .fetch_all(&self.pool)
        .await?;
        let mut gateways = Vec::with_capacity(rows.len());
        for row in rows {
            gateways.push(gateway_from_row(&row)?);
        }
        Ok(gateways)
    }

    /// 查找指定网关
    async fn find_gateway(
        &self,
        network_code: &str,
        mac: &str,
    ) -> Result<Option<GatewayRecord>, StorageError> {
        let row = sqlx::query(
            "select mac, network_code, name, description \
             from gateways where network_code = $1 and mac = $2",
        )
        .bind(network_code)
        .bind(mac)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(gateway_from_row(&row)?))
    }

    async fn find_gateway_by_mac(&self, mac: &str) -> Result<Option<GatewayRecord>, StorageError> {
        let row = sqlx::query(
            "select mac, network_code, name, description from gateways where mac = $1",
        )
        .bind(mac)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(gateway_from_row(&row)?))
    }

    /// 创建新网关
    async fn insert_gateway(&self, record: GatewayRecord) -> Result<GatewayRecord, StorageError> {
        sqlx::query(
            "insert into gateways (mac, network_code, name, description) \
             values ($1, $2, $3, $4)",
        )
        .bind(&record.mac)
        .bind(&record.network_code)
        .bind(&record.name)
        .bind(&record.description)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    /// 更新网关
    async fn update_gateway(
        &self,
        network_code: &str,
        mac: &str,
        update: &GatewayUpdate,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "update gateways set \
             mac = coalesce($1, mac), \
             name = coalesce($2, name), \
             description = coalesce($3, description) \
             where network_code = $4 and mac = $5",
        )
        .bind(&update.mac)
        .bind(&update.name)
        .bind(&update.description)
        .bind(network_code)
        .bind(mac)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// 删除网关
    async fn delete_gateway(&self, network_code: &str, mac: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("delete from gateways where network_code = $1 and mac = $2")
            .bind(network_code)
            .bind(mac)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
