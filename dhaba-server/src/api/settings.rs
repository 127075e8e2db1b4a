//! Restaurant Settings Routes
//!
//! 设置存在单文档 `restaurant:main`。税率更新立即生效：写库后
//! 刷新缓存并重算所有未结账桌台的显示合计。

use axum::middleware::from_fn_with_state;
use axum::{Json, Router, extract::State, routing::get, routing::put};
use validator::Validate;

use crate::auth::{perm, require_permission};
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub fn router(state: ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/api/settings", get(get_settings))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::SETTINGS_READ),
        ));

    let write = Router::new()
        .route("/api/settings", put(update_settings))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::SETTINGS_WRITE),
        ));

    read.merge(write)
}

pub async fn get_settings(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    Ok(ok(state.restaurant_repository().get().await?))
}

pub async fn update_settings(
    State(state): State<ServerState>,
    Json(data): Json<RestaurantUpdate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.restaurant_repository().update(data).await?;
    state.refresh_rates().await?;

    tracing::info!(
        gst_rate = updated.gst_rate,
        service_rate = updated.service_rate,
        "Settings updated, open tables recomputed"
    );
    Ok(ok(updated))
}
