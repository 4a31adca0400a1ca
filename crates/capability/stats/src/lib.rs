//! 统计引擎与测量值聚合。
//!
//! 两部分都是纯函数，不做 I/O：
//! - [`stats`]：均值、总体方差、两倍标准差异常带
//! - [`aggregate`]：按传感器分组、异常值标注与过滤、最小记录占位

pub mod aggregate;
pub mod stats;

pub use aggregate::{AggregateMode, FlaggedMeasurement, SensorMeasurements, aggregate};
pub use stats::{Stats, compute_stats};
