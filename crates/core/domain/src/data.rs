use chrono::{DateTime, Utc};

/// 单条测量值（聚合器输入）。
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub sensor_mac: String,
    pub created_at: DateTime<Utc>,
    pub value: f64,
}

/// 查询时间窗，两端均为闭区间，可各自缺省。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// 不限时间范围。
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// 至少一端有界。
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        if let Some(start) = &self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = &self.end {
            if ts > end {
                return false;
            }
        }
        true
    }
}
