mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{GW, NET, SENSOR, readings, seeded, sensor};
use domain::TimeWindow;
use iot_hierarchy::{HierarchyError, Reading};

#[tokio::test]
async fn store_requires_full_sensor_path() {
    let fixture = seeded().await;
    let err = fixture
        .repos
        .measurements
        .store_measurements(NET, GW, "AA:BB:CC:00:01:0F", readings(&[1.0]))
        .await
        .unwrap_err();
    assert!(matches!(err, HierarchyError::NotFound(_)));
    assert_eq!(fixture.store.measurement_count(), 0);
}

#[tokio::test]
async fn store_returns_number_written() {
    let fixture = seeded().await;
    let stored = fixture
        .repos
        .measurements
        .store_measurements(NET, GW, SENSOR, readings(&[1.0, 2.0, 3.0]))
        .await
        .expect("store");
    assert_eq!(stored, 3);
    assert_eq!(fixture.store.measurement_count(), 3);
}

#[tokio::test]
async fn sensor_query_flags_nothing_inside_band() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    repos
        .measurements
        .store_measurements(NET, GW, SENSOR, readings(&[23.5, 24.1, 30.0]))
        .await
        .expect("store");

    let result = repos
        .measurements
        .get_measurements_by_sensor(NET, GW, SENSOR, &TimeWindow::unbounded())
        .await
        .expect("query");
    let stats = result.stats.expect("stats");
    assert!((stats.mean - 25.866_666_666_666_664).abs() < 1e-9);
    assert!((stats.variance - 8.602_222_222_222_222).abs() < 1e-9);
    assert!(stats.start_date.is_none());
    let items = result.measurements.expect("measurements");
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| !item.is_outlier));

    let outliers = repos
        .measurements
        .get_outliers_by_sensor(NET, GW, SENSOR, &TimeWindow::unbounded())
        .await
        .expect("outliers");
    assert!(outliers.stats.is_some());
    assert!(outliers.measurements.is_none());
}

#[tokio::test]
async fn stats_for_sensor_without_data_are_zero() {
    let fixture = seeded().await;
    let stats = fixture
        .repos
        .measurements
        .get_stats_by_sensor(NET, GW, SENSOR, &TimeWindow::unbounded())
        .await
        .expect("stats");
    assert_eq!(stats.mean, 0.0);
    assert_eq!(stats.variance, 0.0);
    assert_eq!(stats.upper_threshold, 0.0);
    assert_eq!(stats.lower_threshold, 0.0);
}

#[tokio::test]
async fn sensor_without_data_yields_minimal_record() {
    let fixture = seeded().await;
    let result = fixture
        .repos
        .measurements
        .get_measurements_by_sensor(NET, GW, SENSOR, &TimeWindow::unbounded())
        .await
        .expect("query");
    assert_eq!(result.sensor_mac, SENSOR);
    assert!(result.is_minimal());
}

#[tokio::test]
async fn network_query_drops_foreign_sensor_macs() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    repos
        .measurements
        .store_measurements(NET, GW, SENSOR, readings(&[10.0, 12.0]))
        .await
        .expect("store");

    let requested = vec![SENSOR.to_string(), "AA:BB:CC:00:01:0F".to_string()];
    let result = repos
        .measurements
        .get_measurements_by_network(NET, Some(&requested), &TimeWindow::unbounded())
        .await
        .expect("query");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].sensor_mac, SENSOR);
    assert_eq!(result[0].measurements.as_ref().expect("items").len(), 2);
}

#[tokio::test]
async fn unresolvable_sensor_list_short_circuits_to_empty() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    repos
        .measurements
        .store_measurements(NET, GW, SENSOR, readings(&[10.0]))
        .await
        .expect("store");

    let requested = vec!["AA:BB:CC:00:01:0F".to_string()];
    let result = repos
        .measurements
        .get_stats_by_network(NET, Some(&requested), &TimeWindow::unbounded())
        .await
        .expect("query");
    assert!(result.is_empty());

    let result = repos
        .measurements
        .get_outliers_by_network(NET, Some(&[]), &TimeWindow::unbounded())
        .await
        .expect("query");
    assert!(result.is_empty());
}

#[tokio::test]
async fn network_query_for_missing_network_is_not_found() {
    let fixture = seeded().await;
    let err = fixture
        .repos
        .measurements
        .get_measurements_by_network("NOPE", None, &TimeWindow::unbounded())
        .await
        .unwrap_err();
    assert!(matches!(err, HierarchyError::NotFound(_)));
}

#[tokio::test]
async fn resolve_keeps_caller_order_and_dedupes() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    let second = "AA:BB:CC:00:01:02";
    repos
        .sensors
        .create_sensor(NET, GW, sensor(second))
        .await
        .expect("sensor");

    let requested = vec![
        second.to_string(),
        "AA:BB:CC:00:01:0F".to_string(),
        SENSOR.to_string(),
        second.to_string(),
    ];
    let macs = repos
        .measurements
        .resolve_sensor_macs(NET, Some(&requested))
        .await
        .expect("resolve");
    assert_eq!(macs, vec![second.to_string(), SENSOR.to_string()]);

    let all = repos
        .measurements
        .resolve_sensor_macs(NET, None)
        .await
        .expect("resolve");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn network_stats_cover_every_sensor_and_carry_window() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    repos
        .sensors
        .create_sensor(NET, GW, sensor("AA:BB:CC:00:01:02"))
        .await
        .expect("sensor");
    repos
        .measurements
        .store_measurements(NET, GW, SENSOR, readings(&[1.0, 3.0]))
        .await
        .expect("store");

    let start = Utc.with_ymd_and_hms(2025, 2, 18, 0, 0, 0).unwrap();
    let window = TimeWindow::new(Some(start), None);
    let result = repos
        .measurements
        .get_stats_by_network(NET, None, &window)
        .await
        .expect("stats");
    assert_eq!(result.len(), 2);
    let with_data = result
        .iter()
        .find(|item| item.sensor_mac == SENSOR)
        .expect("sensor");
    let stats = with_data.stats.as_ref().expect("stats");
    assert_eq!(stats.start_date, Some(start));
    assert!(stats.end_date.is_none());
    assert!(with_data.measurements.is_none());
    let empty = result
        .iter()
        .find(|item| item.sensor_mac != SENSOR)
        .expect("other");
    assert!(empty.is_minimal());
}

#[tokio::test]
async fn window_filters_measurements_before_aggregation() {
    let fixture = seeded().await;
    let repos = &fixture.repos;
    let base = Utc.with_ymd_and_hms(2025, 2, 18, 15, 0, 0).unwrap();
    let batch = vec![
        Reading {
            created_at: base,
            value: 1.0,
        },
        Reading {
            created_at: base + Duration::days(2),
            value: 5.0,
        },
    ];
    repos
        .measurements
        .store_measurements(NET, GW, SENSOR, batch)
        .await
        .expect("store");

    let window = TimeWindow::new(Some(base + Duration::days(1)), None);
    let result = repos
        .measurements
        .get_measurements_by_sensor(NET, GW, SENSOR, &window)
        .await
        .expect("query");
    let items = result.measurements.expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].value, 5.0);

    let window = TimeWindow::new(None, Some(base - Duration::days(1)));
    let result = repos
        .measurements
        .get_measurements_by_sensor(NET, GW, SENSOR, &window)
        .await
        .expect("query");
    assert!(result.is_minimal());
}
