//! Product Catalog Routes

use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{perm, require_permission};
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router(state: ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/api/products", get(list))
        .route("/api/products/{id}", get(get_one))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::PRODUCTS_READ),
        ));

    let write = Router::new()
        .route("/api/products", post(create))
        .route("/api/products/{id}", put(update).delete(delete))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::PRODUCTS_WRITE),
        ));

    read.merge(write)
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// 按分类过滤
    pub category: Option<String>,
}

/// List products, optionally filtered by category
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let repo = state.product_repository();
    let products = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => repo.find_by_category(category).await?,
        None => repo.find_all().await?,
    };
    Ok(ok(products))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state
        .product_repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(ok(product))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let created = state.product_repository().create(data).await?;
    tracing::info!(product = %created.name, "Product created");
    Ok(ok(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let updated = state.product_repository().update(&id, data).await?;
    Ok(ok(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.product_repository().delete(&id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(ok_with_message((), "Product deleted"))
}
