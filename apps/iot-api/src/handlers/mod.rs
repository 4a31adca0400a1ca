//! Handlers 模块

pub mod auth;
pub mod gateways;
pub mod measurements;
pub mod metrics;
pub mod networks;
pub mod sensors;
pub mod users;

pub use auth::*;
pub use gateways::*;
pub use measurements::*;
pub use metrics::*;
pub use networks::*;
pub use sensors::*;
pub use users::*;
