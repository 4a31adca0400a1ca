//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未设置时使用内存存储
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: u64,
    /// 设置时启动阶段确保存在 admin 账户
    pub default_admin_password: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（环境变量之外主要用于测试）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = read_optional(&lookup, "IOT_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("IOT_JWT_SECRET".to_string()))?;
        let jwt_ttl_seconds = read_u64_with_default(&lookup, "IOT_JWT_TTL_SECONDS", 3600)?;
        let http_addr =
            read_optional(&lookup, "IOT_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string());
        let database_url = read_optional(&lookup, "IOT_DATABASE_URL");
        let database_max_connections =
            read_u32_with_default(&lookup, "IOT_DATABASE_MAX_CONNECTIONS", 8)?;
        let default_admin_password = read_optional(&lookup, "IOT_DEFAULT_ADMIN_PASSWORD");

        Ok(Self {
            http_addr,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            default_admin_password,
        })
    }
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_u64_with_default<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = read_optional(lookup, key) else {
        return Ok(default);
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u32_with_default<F>(lookup: &F, key: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = read_optional(lookup, key) else {
        return Ok(default);
    };
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
