//! Printer Routes

use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;

use crate::auth::{perm, require_permission};
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/print/status", get(status))
        .route("/api/print/test", post(test_print))
        .route("/api/print/kot/{table_id}", post(reprint_kot))
        .route_layer(from_fn_with_state(state, require_permission(perm::PRINT)))
}

#[derive(Serialize)]
pub struct PrintStatus {
    /// 是否配置了网络打印机
    pub configured: bool,
    /// 网络打印机是否在线
    pub online: bool,
}

pub async fn status(State(state): State<ServerState>) -> AppResult<Json<AppResponse<PrintStatus>>> {
    Ok(ok(PrintStatus {
        configured: state.config.printer_addr.is_some(),
        online: state.print_service().is_online().await,
    }))
}

/// Send a self-test slip to the printer
pub async fn test_print(State(state): State<ServerState>) -> AppResult<Json<AppResponse<()>>> {
    let restaurant = state.restaurant_repository().get().await?;
    state.print_service().print_test(&restaurant.name).await?;
    Ok(ok_with_message((), "Test slip sent to printer"))
}

/// Resend the latest kitchen ticket of a table
///
/// For when the kitchen copy jams or goes missing. Only the most
/// recent order group is reprinted.
pub async fn reprint_kot(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let session = state.table_manager().snapshot(&table_id)?;
    let group = session
        .orders
        .last()
        .ok_or_else(|| AppError::Validation(format!("Table {} has no orders", session.name)))?;

    state
        .print_service()
        .print_kot(Some(&session.name), group)
        .await?;
    tracing::info!(table = %session.name, "Kitchen ticket reprinted");
    Ok(ok_with_message((), "Kitchen ticket sent to printer"))
}
