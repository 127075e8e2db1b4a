//! 健康检查路由 - 公共路由 (无需认证)

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    /// 数据库是否可达
    database: bool,
    /// 网络打印机是否在线 (未配置时为 false)
    printer_online: bool,
    /// 离线队列中等待重放的订单数
    pending_orders: u64,
}

/// 基础健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = state.db.health().await.is_ok();
    let printer_online = state.print_service().is_online().await;
    let pending_orders = state.offline_queue().len().unwrap_or(0);

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
        printer_online,
        pending_orders,
    })
}
