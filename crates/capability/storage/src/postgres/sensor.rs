//! Postgres 传感器存储实现
//!
//! 传感器表只保存 gateway_mac，网络归属通过关联 gateways 表判断。

use crate::error::StorageError;
use crate::models::{SensorRecord, SensorUpdate};
use crate::traits::SensorStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgSensorStore {
    pub pool: PgPool,
}

impl PgSensorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sensor_from_row(row: &PgRow) -> Result<SensorRecord, sqlx::Error> {
    Ok(SensorRecord {
        mac: row.try_get("mac")?,
        gateway_mac: row.try_get("gateway_mac")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        variable: row.try_get("variable")?,
        unit: row.try_get("unit")?,
    })
}

#[async_trait::async_trait]
impl SensorStore for PgSensorStore {
    async fn list_sensors(
        &self,
        network_code: &str,
        gateway_mac: &str,
    ) -> Result<Vec<SensorRecord>, StorageError> {
        let rows = sqlx::query(
            "select s.mac, s.gateway_mac, s.name, s.description, s.variable, s.unit \
             from sensors s join gateways g on g.mac = s.gateway_mac \
             where g.network_code = $1 and s.gateway_mac = $2 \
             order by s.mac",
        )
        .bind(network_code)
        .bind(gateway_mac)
        .fetch_all(&self.pool)
        .await?;
        let mut sensors = Vec::with_capacity(rows.len());
        for row in rows {
            sensors.push(sensor_from_row(&row)?);
        }
        Ok(sensors)
    }

    async fn find_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<Option<SensorRecord>, StorageError> {
        let row = sqlx::query(
            "select s.mac, s.gateway_mac, s.name, s.description, s.variable, s.unit \
             from sensors s join gateways g on g.mac = s.gateway_mac \
             where g.network_code = $1 and s.gateway_mac = $2 and s.mac = $3",
        )
        .bind(network_code)
        .bind(gateway_mac)
        .bind(mac)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(sensor_from_row(&row)?))
    }

    async fn find_sensor_by_mac(&self, mac: &str) -> Result<Option<SensorRecord>, StorageError> {
        let row = sqlx::query(
            "select mac, gateway_mac, name, description, variable, unit \
             from sensors where mac = $1",
        )
        .bind(mac)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(sensor_from_row(&row)?))
    }

    async fn list_sensor_macs(
        &self,
        network_code: &str,
        only: Option<&[String]>,
    ) -> Result<Vec<String>, StorageError> {
        let only: Option<Vec<String>> = only.map(|macs| macs.to_vec());
        let macs: Vec<String> = sqlx::query_scalar(
            "select s.mac from sensors s join gateways g on g.mac = s.gateway_mac \
             where g.network_code = $1 and ($2::text[] is null or s.mac = any($2)) \
             order by s.mac",
        )
        .bind(network_code)
        .bind(only)
        .fetch_all(&self.pool)
        .await?;
        Ok(macs)
    }

    async fn insert_sensor(&self, record: SensorRecord) -> Result<SensorRecord, StorageError> {
        sqlx::query(
            "insert into sensors (mac, gateway_mac, name, description, variable, unit) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.mac)
        .bind(&record.gateway_mac)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.variable)
        .bind(&record.unit)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
        update: &SensorUpdate,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "update sensors set \
             mac = coalesce($1, mac), \
             name = coalesce($2, name), \
             description = coalesce($3, description), \
             variable = coalesce($4, variable), \
             unit = coalesce($5, unit) \
             where mac = $6 and gateway_mac = $7 \
             and exists (select 1 from gateways g where g.mac = $7 and g.network_code = $8)",
        )
        .bind(&update.mac)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.variable)
        .bind(&update.unit)
        .bind(mac)
        .bind(gateway_mac)
        .bind(network_code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_sensor(
        &self,
        network_code: &str,
        gateway_mac: &str,
        mac: &str,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "delete from sensors where mac = $1 and gateway_mac = $2 \
             and exists (select 1 from gateways g where g.mac = $2 and g.network_code = $3)",
        )
        .bind(mac)
        .bind(gateway_mac)
        .bind(network_code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
