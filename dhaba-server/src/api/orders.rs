//! Order History and Counter Checkout Routes

use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shared::order::{CartItem, CustomerInfo};

use crate::auth::{CurrentUser, perm, require_permission};
use crate::billing::{Cart, CheckoutService, PaymentRequest};
use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

pub fn router(state: ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/{id}", get(get_one))
        .route("/api/orders/receipt/{number}", get(get_by_receipt))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::ORDERS_READ),
        ));

    let write = Router::new()
        .route("/api/orders/checkout", post(counter_checkout))
        .route("/api/orders/{id}/cancel", post(cancel))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::ORDERS_WRITE),
        ));

    let reprint = Router::new()
        .route("/api/orders/{id}/reprint", post(reprint))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::PRINT),
        ));

    read.merge(write).merge(reprint)
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// 营业日 (YYYY-MM-DD，本地时区)；缺省时返回最近订单
    pub date: Option<String>,
    pub limit: Option<usize>,
}

/// List orders by business day or most recent first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = state.order_repository();
    let orders = match query.date.as_deref().filter(|d| !d.is_empty()) {
        Some(date) => repo.find_by_date(date).await?,
        None => {
            let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
            repo.find_recent(limit).await?
        }
    };
    Ok(ok(orders))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .order_repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
    Ok(ok(order))
}

pub async fn get_by_receipt(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .order_repository()
        .find_by_receipt(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Receipt {} not found", number)))?;
    Ok(ok(order))
}

/// Void a completed order
///
/// The document stays for the audit trail, only the status flips.
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let cancelled = state.order_repository().cancel(&id).await?;
    tracing::info!(
        receipt = %cancelled.receipt_number,
        cancelled_by = %user.id,
        "Order cancelled"
    );
    Ok(ok_with_message(cancelled, "Order cancelled"))
}

/// Reprint the receipt of a past order
pub async fn reprint(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let order = state
        .order_repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
    let restaurant = state.restaurant_repository().get().await?;

    state.print_service().print_receipt(&order, &restaurant).await?;
    tracing::info!(receipt = %order.receipt_number, "Receipt reprinted");
    Ok(ok_with_message((), "Receipt sent to printer"))
}

// ========== Counter checkout ==========

#[derive(Debug, Deserialize)]
pub struct CounterCheckoutRequest {
    pub items: Vec<CartItem>,
    pub customer: Option<CustomerInfo>,
    #[serde(flatten)]
    pub payment: PaymentRequest,
}

#[derive(Debug, Serialize)]
pub struct CounterCheckoutResponse {
    pub order: Order,
    pub persisted: bool,
}

/// Walk-in sale without a table
///
/// 现算现结：同商品行合并，合计按当前税率计算，支付校验
/// 通过后直接落单。
pub async fn counter_checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CounterCheckoutRequest>,
) -> AppResult<Json<AppResponse<CounterCheckoutResponse>>> {
    if req.items.is_empty() {
        return Err(AppError::Validation("order has no items".to_string()));
    }
    let cart = Cart::from_items(req.items)?;

    let totals = cart.totals(state.rates());
    let payment_info = CheckoutService::resolve_payment(&req.payment, totals.total)?;

    let outcome = state
        .checkout_service()
        .checkout(
            None,
            cart.items().to_vec(),
            totals,
            payment_info,
            req.customer,
            user.id,
        )
        .await;

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

    Ok(ok(CounterCheckoutResponse {
        order: outcome.order,
        persisted: outcome.persisted,
    }))
}
