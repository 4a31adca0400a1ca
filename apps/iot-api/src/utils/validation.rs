//! 输入验证辅助函数
//!
//! 提供统一的输入验证函数：
//! - normalize_required：去除首尾空格并检查非空
//! - optional_text：描述性字段去除首尾空格，空白视为未提供
//! - network_code / mac_address：标识格式校验
//! - parse_measurement_query：解析 `sensorMacs`、`startDate`、`endDate`
//!
//! 失败返回 bad_request_error 响应。

use crate::utils::response::bad_request_error;
use axum::response::Response;
use chrono::{DateTime, Utc};
use domain::{TimeWindow, is_mac_address, is_network_code};

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 可选描述性字段：去除空格，空白串按未提供处理（不落库空字符串）
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 校验网络编码（非空字母数字）
pub fn network_code(value: String, field: &str) -> Result<String, Response> {
    let value = normalize_required(value, field)?;
    if !is_network_code(&value) {
        return Err(bad_request_error(format!("{field} must be alphanumeric")));
    }
    Ok(value)
}

/// 校验 mac 地址（冒号分隔的 6 组十六进制）
pub fn mac_address(value: String, field: &str) -> Result<String, Response> {
    let value = normalize_required(value, field)?;
    if !is_mac_address(&value) {
        return Err(bad_request_error(format!("{field} must be a mac address")));
    }
    Ok(value)
}

/// 测量值查询参数。
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementQuery {
    /// 未提供 `sensorMacs` 时为 None（表示不限传感器）
    pub sensor_macs: Option<Vec<String>>,
    pub window: TimeWindow,
}

/// 解析测量值查询参数。
///
/// `sensorMacs` 支持重复参数与逗号分隔两种写法；时间为 RFC 3339，且 `startDate <= endDate`。
pub fn parse_measurement_query(pairs: &[(String, String)]) -> Result<MeasurementQuery, Response> {
    let mut sensor_macs: Option<Vec<String>> = None;
    let mut start: Option<DateTime<Utc>> = None;
    let mut end: Option<DateTime<Utc>> = None;
    for (key, value) in pairs {
        match key.as_str() {
            "sensorMacs" => {
                // 格式不对或不属于该网络的 mac 由仓储静默丢弃
                let macs = sensor_macs.get_or_insert_with(Vec::new);
                macs.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|mac| !mac.is_empty())
                        .map(str::to_string),
                );
            }
            "startDate" => start = Some(parse_timestamp(value, "startDate")?),
            "endDate" => end = Some(parse_timestamp(value, "endDate")?),
            _ => {}
        }
    }
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(bad_request_error("startDate must not be after endDate"));
        }
    }
    Ok(MeasurementQuery {
        sensor_macs,
        window: TimeWindow::new(start, end),
    })
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, Response> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| bad_request_error(format!("{field} must be an RFC 3339 timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::TimeZone;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn sensor_macs_accept_repeated_and_comma_separated() {
        let query = parse_measurement_query(&pairs(&[
            ("sensorMacs", "AA:BB:CC:DD:EE:01,AA:BB:CC:DD:EE:02"),
            ("sensorMacs", "AA:BB:CC:DD:EE:03"),
        ]))
        .expect("query");
        assert_eq!(query.sensor_macs.expect("macs").len(), 3);
        assert!(!query.window.is_bounded());
    }

    #[test]
    fn malformed_sensor_macs_are_passed_through() {
        let query = parse_measurement_query(&pairs(&[
            ("sensorMacs", "AA:BB:CC:DD:EE:01"),
            ("sensorMacs", "Y"),
        ]))
        .expect("query");
        assert_eq!(
            query.sensor_macs,
            Some(vec!["AA:BB:CC:DD:EE:01".to_string(), "Y".to_string()])
        );
    }

    #[test]
    fn blank_optional_text_is_absent() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" lab ".to_string())), Some("lab".to_string()));
    }

    #[test]
    fn absent_sensor_macs_means_unrestricted() {
        let query = parse_measurement_query(&[]).expect("query");
        assert!(query.sensor_macs.is_none());
    }

    #[test]
    fn dates_are_parsed_with_offsets() {
        let query = parse_measurement_query(&pairs(&[
            ("startDate", "2025-02-18T16:00:00+01:00"),
            ("endDate", "2025-02-18T17:00:00Z"),
        ]))
        .expect("query");
        assert_eq!(
            query.window.start,
            Some(Utc.with_ymd_and_hms(2025, 2, 18, 15, 0, 0).unwrap())
        );
        assert!(query.window.end.is_some());
    }

    #[test]
    fn invalid_input_is_bad_request() {
        let cases = [
            pairs(&[("startDate", "yesterday")]),
            pairs(&[
                ("startDate", "2025-02-19T00:00:00Z"),
                ("endDate", "2025-02-18T00:00:00Z"),
            ]),
        ];
        for case in cases {
            let response = parse_measurement_query(&case).unwrap_err();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(network_code(" NET1 ".to_string(), "code").is_ok());
        assert!(network_code("NET-1".to_string(), "code").is_err());
        assert!(mac_address("aa:bb:cc:dd:ee:ff".to_string(), "macAddress").is_ok());
        assert!(mac_address("aa:bb:cc:dd:ee".to_string(), "macAddress").is_err());
    }
}
