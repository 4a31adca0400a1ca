//! Postgres 测量值存储实现

use crate::error::StorageError;
use crate::models::{MeasurementRecord, NewMeasurement};
use crate::traits::MeasurementStore;
use domain::TimeWindow;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgMeasurementStore {
    pub pool: PgPool,
}

impl PgMeasurementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn measurement_from_row(row: &PgRow) -> Result<MeasurementRecord, sqlx::Error> {
    Ok(MeasurementRecord {
        id: row.try_get("id")?,
        sensor_mac: row.try_get("sensor_mac")?,
        created_at: row.try_get("created_at")?,
        value: row.try_get("value")?,
    })
}

#[async_trait::async_trait]
impl MeasurementStore for PgMeasurementStore {
    async fn insert_measurement(
        &self,
        value: NewMeasurement,
    ) -> Result<MeasurementRecord, StorageError> {
        let row = sqlx::query(
            "insert into measurements (sensor_mac, created_at, value) \
             values ($1, $2, $3) \
             returning id, sensor_mac, created_at, value",
        )
        .bind(&value.sensor_mac)
        .bind(value.created_at)
        .bind(value.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(measurement_from_row(&row)?)
    }

    async fn list_measurements(
        &self,
        sensor_macs: &[String],
        window: &TimeWindow,
    ) -> Result<Vec<MeasurementRecord>, StorageError> {
        if sensor_macs.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "select id, sensor_mac, created_at, value \
             from measurements \
             where sensor_mac = any($1) \
             and ($2::timestamptz is null or created_at >= $2) \
             and ($3::timestamptz is null or created_at <= $3) \
             order by created_at asc, id asc",
        )
        .bind(sensor_macs.to_vec())
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(measurement_from_row(&row)?);
        }
        Ok(items)
    }
}
