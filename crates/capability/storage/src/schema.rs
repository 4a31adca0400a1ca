//! 数据库表结构
//!
//! 启动时执行 `create table if not exists`，保证表与级联外键存在。
//! 所有语句幂等，可重复执行。
//!
//! 网关与传感器共用一个 mac 命名空间：`device_macs` 以 mac 为主键，
//! 由两张表上的触发器在插入、改名、删除（含级联删除）时同步维护，
//! 跨表 mac 冲突在数据库层以唯一约束（SQLSTATE 23505）拒绝。

use crate::error::StorageError;
use sqlx::PgPool;

const SCHEMA: &[&str] = &[
    "create table if not exists networks (
        code text primary key,
        name text,
        description text
    )",
    "create table if not exists gateways (
        mac text primary key,
        network_code text not null references networks(code)
            on update cascade on delete cascade,
        name text,
        description text
    )",
    "create table if not exists sensors (
        mac text primary key,
        gateway_mac text not null references gateways(mac)
            on update cascade on delete cascade,
        name text,
        description text,
        variable text,
        unit text
    )",
    "create table if not exists measurements (
        id bigserial primary key,
        sensor_mac text not null references sensors(mac)
            on update cascade on delete cascade,
        created_at timestamptz not null,
        value double precision not null
    )",
    "create index if not exists measurements_sensor_time_idx
        on measurements (sensor_mac, created_at)",
    "create table if not exists device_macs (
        mac text primary key,
        kind text not null
    )",
    "insert into device_macs (mac, kind) select mac, 'gateway' from gateways
        on conflict (mac) do nothing",
    "insert into device_macs (mac, kind) select mac, 'sensor' from sensors
        on conflict (mac) do nothing",
    "create or replace function sync_device_mac() returns trigger as $$
    begin
        if tg_op = 'INSERT' then
            insert into device_macs (mac, kind) values (new.mac, tg_argv[0]);
        elsif tg_op = 'UPDATE' then
            if new.mac <> old.mac then
                update device_macs set mac = new.mac where mac = old.mac;
            end if;
        elsif tg_op = 'DELETE' then
            delete from device_macs where mac = old.mac;
        end if;
        return null;
    end;
    $$ language plpgsql",
    "drop trigger if exists gateways_device_mac on gateways",
    "create trigger gateways_device_mac
        after insert or update of mac or delete on gateways
        for each row execute function sync_device_mac('gateway')",
    "drop trigger if exists sensors_device_mac on sensors",
    "create trigger sensors_device_mac
        after insert or update of mac or delete on sensors
        for each row execute function sync_device_mac('sensor')",
    "create table if not exists users (
        username text primary key,
        password text not null,
        user_type text not null
    )",
];

/// 建立表结构（幂等）
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StorageError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(tables = 6, "database schema ensured");
    Ok(())
}
