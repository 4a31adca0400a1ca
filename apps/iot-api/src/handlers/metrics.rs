//! Telemetry 指标快照。
//!
//! - GET /metrics

use crate::utils::response::ok;
use api_contract::MetricsSnapshotDto;
use axum::{http::StatusCode, response::Response};
use iot_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    ok(
        StatusCode::OK,
        MetricsSnapshotDto {
            measurements_written: snapshot.measurements_written,
            measurements_failed: snapshot.measurements_failed,
            stats_computed: snapshot.stats_computed,
            outliers_flagged: snapshot.outliers_flagged,
            requests_handled: snapshot.requests_handled,
        },
    )
}
