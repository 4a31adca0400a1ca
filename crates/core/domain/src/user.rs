use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 用户类型（访问控制角色）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Operator,
    Viewer,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Admin, UserType::Operator, UserType::Viewer];
    /// 可写层级资源（network/gateway/sensor/measurement）的角色。
    pub const WRITERS: [UserType; 2] = [UserType::Admin, UserType::Operator];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Operator => "operator",
            UserType::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserType::Admin),
            "operator" => Ok(UserType::Operator),
            "viewer" => Ok(UserType::Viewer),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}
