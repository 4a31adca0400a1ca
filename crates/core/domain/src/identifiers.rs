//! 标识符格式校验。
//!
//! - network code：非空字母数字
//! - gateway/sensor mac：冒号分隔的 6 组两位十六进制（如 `94:3F:BE:4C:4A:79`）

/// 是否为合法的 network code。
pub fn is_network_code(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 是否为冒号分隔的 MAC 地址。
pub fn is_mac_address(value: &str) -> bool {
    let groups: Vec<&str> = value.split(':').collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|group| group.len() == 2 && group.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_colon_hex_mac() {
        assert!(is_mac_address("94:3F:BE:4C:4A:79"));
        assert!(is_mac_address("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn rejects_malformed_mac() {
        assert!(!is_mac_address("94-3F-BE-4C-4A-79"));
        assert!(!is_mac_address("94:3F:BE:4C:4A"));
        assert!(!is_mac_address("94:3F:BE:4C:4A:7G"));
        assert!(!is_mac_address(""));
    }

    #[test]
    fn network_code_is_alphanumeric() {
        assert!(is_network_code("NET01"));
        assert!(!is_network_code("NET-01"));
        assert!(!is_network_code(""));
    }
}
