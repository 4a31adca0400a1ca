//! 追踪、请求 ID 生成与基础计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub measurements_written: u64,
    pub measurements_failed: u64,
    pub stats_computed: u64,
    pub outliers_flagged: u64,
    pub requests_handled: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    measurements_written: AtomicU64,
    measurements_failed: AtomicU64,
    stats_computed: AtomicU64,
    outliers_flagged: AtomicU64,
    requests_handled: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            measurements_written: AtomicU64::new(0),
            measurements_failed: AtomicU64::new(0),
            stats_computed: AtomicU64::new(0),
            outliers_flagged: AtomicU64::new(0),
            requests_handled: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            measurements_written: self.measurements_written.load(Ordering::Relaxed),
            measurements_failed: self.measurements_failed.load(Ordering::Relaxed),
            stats_computed: self.stats_computed.load(Ordering::Relaxed),
            outliers_flagged: self.outliers_flagged.load(Ordering::Relaxed),
            requests_handled: self.requests_handled.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录测量值写入成功次数。
pub fn record_measurement_written() {
    metrics().measurements_written.fetch_add(1, Ordering::Relaxed);
}

/// 记录测量值写入失败次数。
pub fn record_measurement_failed() {
    metrics().measurements_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录统计量计算次数（每个有数据的传感器计一次）。
pub fn record_stats_computed() {
    metrics().stats_computed.fetch_add(1, Ordering::Relaxed);
}

/// 记录被标记为异常的测量值数量。
pub fn record_outliers_flagged(count: u64) {
    if count > 0 {
        metrics().outliers_flagged.fetch_add(count, Ordering::Relaxed);
    }
}

/// 记录已处理的 HTTP 请求数。
pub fn record_request_handled() {
    metrics().requests_handled.fetch_add(1, Ordering::Relaxed);
}
