//! IoT 层级数据 HTTP API：network → gateway → sensor → measurement，
//! 附带按传感器的统计量与异常值查询。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::{Router, middleware as axum_middleware, routing::get};
use domain::UserType;
use iot_auth::{AuthService, JwtManager, hash_password};
use iot_config::AppConfig;
use iot_hierarchy::Repositories;
use iot_storage::{Stores, UserRecord, connect_pool, ensure_schema};
use iot_telemetry::init_tracing;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub repos: Repositories,
    /// 仅 Postgres 后端存在，用于就绪检查
    pub db_pool: Option<PgPool>,
}

/// 组装完整路由：健康检查与指标在根路径，业务接口挂在 `/api/v1` 下。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/readyz", get(handlers::readyz))
        .route("/metrics", get(handlers::get_metrics))
        .nest("/api/v1", routes::create_api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    // 配置了数据库时使用 Postgres，否则使用内存存储
    let (stores, db_pool) = match config.database_url.as_deref() {
        Some(url) => {
            let pool = connect_pool(url, config.database_max_connections).await?;
            ensure_schema(&pool).await?;
            tracing::info!("storage backend: postgres");
            (Stores::postgres(pool.clone()), Some(pool))
        }
        None => {
            tracing::warn!("IOT_DATABASE_URL not set, using in-memory storage");
            (Stores::in_memory(), None)
        }
    };
    let repos = Repositories::new(stores.clone());

    if let Some(password) = config.default_admin_password.as_deref() {
        let record = UserRecord {
            username: "admin".to_string(),
            password: hash_password(password)?,
            user_type: UserType::Admin,
        };
        if repos.users.ensure_user(record).await? {
            tracing::info!("default admin account created");
        }
    }

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_ttl_seconds);
    let auth = Arc::new(AuthService::new(stores.users.clone(), jwt));
    let state = AppState {
        auth,
        repos,
        db_pool,
    };

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "iot-api listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
