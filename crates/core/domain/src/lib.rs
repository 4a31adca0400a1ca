pub mod data;
pub mod identifiers;
pub mod user;

pub use data::{Measurement, TimeWindow};
pub use identifiers::{is_mac_address, is_network_code};
pub use user::UserType;

/// 调用方上下文：由认证层解析出的用户身份与角色。
///
/// 仓储层不接收该上下文，角色校验只发生在处理器调用仓储之前。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
    pub user_type: UserType,
}

impl AuthContext {
    /// 构造显式身份与角色的调用方上下文。
    pub fn new(username: impl Into<String>, user_type: UserType) -> Self {
        Self {
            username: username.into(),
            user_type,
        }
    }

    /// 角色是否在允许列表内。
    pub fn has_any_role(&self, allowed: &[UserType]) -> bool {
        allowed.contains(&self.user_type)
    }
}
