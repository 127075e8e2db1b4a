//! Table Routes
//!
//! 桌台有两层状态：
//! - `dining_table` 集合里的布局文档 (名称/容量)，管理端 CRUD
//! - [`TableManager`](crate::tables::TableManager) 里的实时会话
//!   (状态/客人/订单组/合计)，前台操作
//!
//! 布局 CRUD 需要 settings:write (店主/管理员)；会话操作只需要
//! tables:write，普通员工可用。

use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use shared::order::{BillShare, CartItem, CustomerInfo};
use validator::Validate;

use crate::auth::{CurrentUser, perm, require_permission};
use crate::billing::{CheckoutService, PaymentRequest};
use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate, Order};
use crate::tables::TableSession;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router(state: ServerState) -> Router<ServerState> {
    let session_ops = Router::new()
        .route("/api/tables", get(list))
        .route("/api/tables/{id}/session", get(session))
        .route("/api/tables/{id}/occupy", post(occupy))
        .route("/api/tables/{id}/reserve", post(reserve))
        .route("/api/tables/{id}/order", post(add_order))
        .route("/api/tables/{id}/clear", post(clear))
        .route("/api/tables/{id}/split", get(split_bill))
        .route("/api/tables/{id}/checkout", post(checkout))
        .route("/api/tables/merge", post(merge))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::TABLES_WRITE),
        ));

    let layout_admin = Router::new()
        .route("/api/tables", post(create))
        .route("/api/tables/{id}", put(update).delete(delete))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::SETTINGS_WRITE),
        ));

    session_ops.merge(layout_admin)
}

// ========== Layout CRUD ==========

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<DiningTableCreate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let created = state.dining_table_repository().create(data).await?;

    if let Some(id) = &created.id {
        state.table_manager().register(&id.to_string(), &created.name);
    }
    tracing::info!(table = %created.name, "Dining table created");
    Ok(ok(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<DiningTableUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let updated = state.dining_table_repository().update(&id, data).await?;
    // 改名同步到会话注册表，开台状态保留
    state.table_manager().register(&id, &updated.name);
    Ok(ok(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    if let Ok(session) = state.table_manager().snapshot(&id)
        && !session.orders.is_empty()
    {
        return Err(AppError::BusinessRule(format!(
            "Table {} has an open bill, clear it first",
            session.name
        )));
    }

    state.dining_table_repository().delete(&id).await?;
    state.table_manager().unregister(&id);
    tracing::info!(table_id = %id, "Dining table deleted");
    Ok(ok_with_message((), "Table deleted"))
}

// ========== Session operations ==========

/// All table sessions, sorted by name
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<TableSession>>>> {
    Ok(ok(state.table_manager().list()))
}

pub async fn session(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    Ok(ok(state.table_manager().snapshot(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct OccupyRequest {
    pub customer: CustomerInfo,
}

pub async fn occupy(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<OccupyRequest>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    Ok(ok(state.table_manager().occupy(&id, req.customer)?))
}

pub async fn reserve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    Ok(ok(state.table_manager().reserve(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct AddOrderRequest {
    pub items: Vec<CartItem>,
    /// 桌台还没有客人信息时记录
    pub customer: Option<CustomerInfo>,
}

/// Submit an order group to a table
///
/// 厨房单在后台打印，打印失败不影响下单。
pub async fn add_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<AddOrderRequest>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    let session =
        state
            .table_manager()
            .add_order(&id, req.items, req.customer, state.rates())?;

    if let Some(group) = session.orders.last().cloned() {
        let table_name = session.name.clone();
        let bg = state.clone();
        tokio::spawn(async move {
            if let Err(e) = bg.print_service().print_kot(Some(&table_name), &group).await {
                tracing::warn!(table = %table_name, error = %e, "Kitchen ticket print failed");
            }
        });
    }

    Ok(ok(session))
}

pub async fn clear(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    Ok(ok(state.table_manager().clear(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub source_id: String,
    pub target_id: String,
}

pub async fn merge(
    State(state): State<ServerState>,
    Json(req): Json<MergeRequest>,
) -> AppResult<Json<AppResponse<TableSession>>> {
    let target =
        state
            .table_manager()
            .merge(&req.source_id, &req.target_id, state.rates())?;
    Ok(ok(target))
}

#[derive(Debug, Deserialize)]
pub struct SplitQuery {
    pub parts: u32,
}

/// Even split preview of a table's bill
pub async fn split_bill(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<SplitQuery>,
) -> AppResult<Json<AppResponse<Vec<BillShare>>>> {
    Ok(ok(state.table_manager().split_bill(&id, query.parts)?))
}

// ========== Checkout ==========

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    /// False when the order went to the offline queue
    pub persisted: bool,
}

/// Finalize a table's bill
///
/// 支付校验通过后订单只写一次；无论写库成败，桌台都会被清台
/// (客人已付款)。小票在后台打印。
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(payment): Json<PaymentRequest>,
) -> AppResult<Json<AppResponse<CheckoutResponse>>> {
    let session = state.table_manager().snapshot(&id)?;
    if session.orders.is_empty() {
        return Err(crate::tables::TableError::NotOccupied(id.clone()).into());
    }

    let payment_info = CheckoutService::resolve_payment(&payment, session.totals.total)?;

    let outcome = state
        .checkout_service()
        .checkout(
            Some(session.name.clone()),
            session.all_items(),
            session.totals.clone(),
            payment_info,
            session.customer.clone(),
            user.id,
        )
        .await;

    state.table_manager().clear(&id)?;

    let order = outcome.order.clone();
    let bg = state.clone();
    tokio::spawn(async move {
        let restaurant = match bg.restaurant_repository().get().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Settings unreachable, receipt not printed");
                return;
            }
        };
        if let Err(e) = bg.print_service().print_receipt(&order, &restaurant).await {
            tracing::warn!(receipt = %order.receipt_number, error = %e, "Receipt print failed");
        }
    });

    Ok(ok(CheckoutResponse {
        order: outcome.order,
        persisted: outcome.persisted,
    }))
}
