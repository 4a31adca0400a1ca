//! 统计引擎
//!
//! 对一组数值计算：
//! - `mean`：算术平均
//! - `variance`：总体方差（除数为 n，n < 2 时为 0）
//! - `lower_threshold` / `upper_threshold`：`mean ∓ 2·σ`
//!
//! 除数取 n 而不是 n - 1 是既有行为，外部契约依赖该取值。

use chrono::{DateTime, Utc};
use domain::TimeWindow;

/// 异常带宽度（标准差倍数）。
const THRESHOLD_SIGMAS: f64 = 2.0;

/// 一组测量值的统计量。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub mean: f64,
    pub variance: f64,
    pub upper_threshold: f64,
    pub lower_threshold: f64,
}

impl Stats {
    /// 全零统计量（传感器无数据时的显式默认值）。
    pub fn zeroed() -> Self {
        Self {
            start_date: None,
            end_date: None,
            mean: 0.0,
            variance: 0.0,
            upper_threshold: 0.0,
            lower_threshold: 0.0,
        }
    }

    /// 附带查询时间窗；两端都缺省时不写入日期。
    pub fn with_window(mut self, window: &TimeWindow) -> Self {
        if window.is_bounded() {
            self.start_date = window.start;
            self.end_date = window.end;
        }
        self
    }

    /// 严格落在异常带之外才算异常值，边界值不算。
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_threshold || value > self.upper_threshold
    }
}

/// 计算统计量。
///
/// 调用方须保证 `values` 非空；空输入在 debug 构建下触发断言，
/// release 构建下返回 [`Stats::zeroed`]。
pub fn compute_stats(values: &[f64]) -> Stats {
    debug_assert!(!values.is_empty(), "compute_stats requires at least one sample");
    if values.is_empty() {
        return Stats::zeroed();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = if values.len() < 2 {
        0.0
    } else {
        values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n
    };
    let band = THRESHOLD_SIGMAS * variance.sqrt();

    Stats {
        start_date: None,
        end_date: None,
        mean,
        variance,
        upper_threshold: mean + band,
        lower_threshold: mean - band,
    }
}
