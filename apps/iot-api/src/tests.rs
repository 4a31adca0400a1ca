//! HTTP 层端到端测试：内存存储 + oneshot 驱动完整 Router。

use super::{AppState, app};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use domain::UserType;
use http_body_util::BodyExt;
use iot_auth::{AuthService, JwtManager};
use iot_hierarchy::Repositories;
use iot_storage::{InMemoryStore, Stores, UserRecord};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const NET: &str = "NET1";
const GW: &str = "AA:BB:CC:00:00:01";
const SENSOR_X: &str = "AA:BB:CC:00:01:01";
const SENSOR_Y: &str = "AA:BB:CC:00:01:02";

fn test_app() -> (Router, Repositories) {
    let store = Arc::new(InMemoryStore::with_default_admin("admin123"));
    let stores = Stores::from_in_memory(store);
    let repos = Repositories::new(stores.clone());
    let jwt = JwtManager::new("test-secret".to_string(), 3600);
    let state = AppState {
        auth: Arc::new(AuthService::new(stores.users.clone(), jwt)),
        repos: repos.clone(),
        db_pool: None,
    };
    (app(state), repos)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

/// admin 登录并建好 NET1 / GW / 两个传感器
async fn seeded() -> (Router, String) {
    let (app, _) = test_app();
    let token = login(&app, "admin", "admin123").await;
    let steps = [
        ("/api/v1/networks".to_string(), json!({ "code": NET })),
        (
            format!("/api/v1/networks/{NET}/gateways"),
            json!({ "macAddress": GW }),
        ),
        (
            format!("/api/v1/networks/{NET}/gateways/{GW}/sensors"),
            json!({ "macAddress": SENSOR_X, "variable": "temperature", "unit": "C" }),
        ),
        (
            format!("/api/v1/networks/{NET}/gateways/{GW}/sensors"),
            json!({ "macAddress": SENSOR_Y }),
        ),
    ];
    for (uri, body) in steps {
        let (status, _) = send(&app, "POST", &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}");
    }
    (app, token)
}

#[tokio::test]
async fn health_and_metrics_are_public() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = send(&app, "GET", "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["requestsHandled"].is_u64());
}

#[tokio::test]
async fn login_outcomes() {
    let (app, _) = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth",
        None,
        Some(json!({ "username": "ghost", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE.NOT_FOUND");
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/api/v1/networks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");

    let (status, _) = send(&app, "GET", "/api/v1/networks", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn viewer_reads_but_cannot_write() {
    let (app, repos) = test_app();
    repos
        .users
        .create_user(UserRecord {
            username: "viewer".to_string(),
            password: "view-pass".to_string(),
            user_type: UserType::Viewer,
        })
        .await
        .unwrap();
    let token = login(&app, "viewer", "view-pass").await;

    let (status, _) = send(&app, "GET", "/api/v1/networks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/networks",
        Some(&token),
        Some(json!({ "code": NET })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTH.FORBIDDEN");

    let (status, _) = send(&app, "GET", "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_users() {
    let (app, _) = test_app();
    let token = login(&app, "admin", "admin123").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({ "username": "op", "password": "op-pass", "type": "operator" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "operator");
    assert!(body["data"].get("password").is_none());

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({ "username": "op", "password": "other", "type": "viewer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", "/api/v1/users/op", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/api/v1/users/op", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hierarchy_crud_over_http() {
    let (app, token) = seeded().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/networks",
        Some(&token),
        Some(json!({ "code": NET })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");

    // 传感器 mac 与网关 mac 共用命名空间
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/networks/{NET}/gateways"),
        Some(&token),
        Some(json!({ "macAddress": SENSOR_X })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/api/v1/networks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let network = &body["data"][0];
    assert_eq!(network["code"], NET);
    assert!(network.get("name").is_none());
    assert_eq!(network["gateways"][0]["macAddress"], GW);
    assert_eq!(network["gateways"][0]["sensors"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/networks/{NET}"),
        Some(&token),
        Some(json!({ "code": "NET2", "name": "renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/gateways/{GW}/sensors/{SENSOR_X}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/NET2/gateways/{GW}/sensors/{SENSOR_X}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["variable"], "temperature");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/networks/NET2/gateways/{GW}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/networks/NET2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("gateways").is_none());
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let (app, token) = seeded().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/networks",
        Some(&token),
        Some(json!({ "code": "bad code" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID.REQUEST");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/measurements?startDate=2025-02-19T00:00:00Z&endDate=2025-02-18T00:00:00Z"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn network_measurements_flag_outliers_and_keep_empty_sensors() {
    let (app, token) = seeded().await;
    let readings: Vec<Value> = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 100.0]
        .iter()
        .enumerate()
        .map(|(index, value)| {
            json!({ "createdAt": format!("2025-02-18T15:{index:02}:00Z"), "value": value })
        })
        .collect();
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/networks/{NET}/gateways/{GW}/sensors/{SENSOR_X}/measurements"),
        Some(&token),
        Some(Value::Array(readings)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["stored"], 10);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/measurements"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let x = items
        .iter()
        .find(|item| item["sensorMacAddress"] == SENSOR_X)
        .unwrap();
    assert_eq!(x["stats"]["mean"], 19.0);
    assert_eq!(x["stats"]["variance"], 729.0);
    let measurements = x["measurements"].as_array().unwrap();
    assert_eq!(measurements.len(), 10);
    assert_eq!(
        measurements
            .iter()
            .filter(|item| item["isOutlier"] == true)
            .count(),
        1
    );
    let y = items
        .iter()
        .find(|item| item["sensorMacAddress"] == SENSOR_Y)
        .unwrap();
    assert_eq!(y.as_object().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/outliers?sensorMacs={SENSOR_X}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let outliers = items[0]["measurements"].as_array().unwrap();
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0]["value"], 100.0);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/stats?startDate=2025-02-18T15:00:00Z"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let x = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["sensorMacAddress"] == SENSOR_X)
        .unwrap()
        .clone();
    assert!(x.get("measurements").is_none());
    assert_eq!(x["stats"]["startDate"], "2025-02-18T15:00:00Z");
    assert!(x["stats"].get("endDate").is_none());
}

#[tokio::test]
async fn sensor_stats_without_data_are_zero() {
    let (app, token) = seeded().await;
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/gateways/{GW}/sensors/{SENSOR_Y}/stats"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mean"], 0.0);
    assert_eq!(body["data"]["variance"], 0.0);
    assert_eq!(body["data"]["upperThreshold"], 0.0);
    assert_eq!(body["data"]["lowerThreshold"], 0.0);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/gateways/{GW}/sensors/FF:FF:FF:FF:FF:FF/stats"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sensor_outliers_without_outliers_omit_measurements() {
    let (app, token) = seeded().await;
    let readings = json!([
        { "createdAt": "2025-02-18T15:00:00Z", "value": 23.5 },
        { "createdAt": "2025-02-18T15:01:00Z", "value": 24.1 },
        { "createdAt": "2025-02-18T15:02:00Z", "value": 30.0 },
    ]);
    let sensor = format!("/api/v1/networks/{NET}/gateways/{GW}/sensors/{SENSOR_X}");
    let (status, _) = send(
        &app,
        "POST",
        &format!("{sensor}/measurements"),
        Some(&token),
        Some(readings),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", &format!("{sensor}/outliers"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sensorMacAddress"], SENSOR_X);
    assert!(body["data"]["stats"].is_object());
    assert!(body["data"].get("measurements").is_none());
}

#[tokio::test]
async fn blank_descriptive_fields_are_absent() {
    let (app, token) = seeded().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/networks",
        Some(&token),
        Some(json!({ "code": "NET2", "name": "", "description": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"].get("name").is_none());
    assert!(body["data"].get("description").is_none());

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/networks/{NET}/gateways/{GW}/sensors"),
        Some(&token),
        Some(json!({ "macAddress": "AA:BB:CC:00:01:03", "variable": "humidity", "unit": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["variable"], "humidity");
    assert!(body["data"].get("unit").is_none());

    // 只含空白字段的更新等同于空更新
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/networks/{NET}"),
        Some(&token),
        Some(json!({ "name": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_sensor_macs_are_dropped() {
    let (app, token) = seeded().await;
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/networks/{NET}/measurements?sensorMacs=not-a-mac&sensorMacs={SENSOR_Y}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sensorMacAddress"], SENSOR_Y);
}
