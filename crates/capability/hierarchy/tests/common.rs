#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use iot_hierarchy::{Reading, Repositories};
use iot_storage::{GatewayRecord, InMemoryStore, NetworkRecord, SensorRecord, Stores};
use std::sync::Arc;

pub const NET: &str = "NET1";
pub const GW: &str = "AA:BB:CC:00:00:01";
pub const SENSOR: &str = "AA:BB:CC:00:01:01";

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub repos: Repositories,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let repos = Repositories::new(Stores::from_in_memory(store.clone()));
    Fixture { store, repos }
}

pub fn network(code: &str) -> NetworkRecord {
    NetworkRecord {
        code: code.to_string(),
        name: None,
        description: None,
    }
}

pub fn gateway(mac: &str) -> GatewayRecord {
    GatewayRecord {
        mac: mac.to_string(),
        network_code: String::new(),
        name: None,
        description: None,
    }
}

pub fn sensor(mac: &str) -> SensorRecord {
    SensorRecord {
        mac: mac.to_string(),
        gateway_mac: String::new(),
        name: None,
        description: None,
        variable: None,
        unit: None,
    }
}

pub fn readings(values: &[f64]) -> Vec<Reading> {
    let base = Utc.with_ymd_and_hms(2025, 2, 18, 15, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Reading {
            created_at: base + Duration::minutes(index as i64),
            value: *value,
        })
        .collect()
}

/// NET1 / GW / SENSOR
pub async fn seeded() -> Fixture {
    let fixture = fixture();
    fixture
        .repos
        .networks
        .create_network(network(NET))
        .await
        .expect("network");
    fixture
        .repos
        .gateways
        .create_gateway(NET, gateway(GW))
        .await
        .expect("gateway");
    fixture
        .repos
        .sensors
        .create_sensor(NET, GW, sensor(SENSOR))
        .await
        .expect("sensor");
    fixture
}
