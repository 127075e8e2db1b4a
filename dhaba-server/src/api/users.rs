//! Staff Management Routes
//!
//! 仅店主可见 (users:read / users:write 只授予 owner)。

use axum::middleware::from_fn_with_state;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use validator::Validate;

use crate::auth::{Role, perm, require_permission};
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserResponse, UserUpdate};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

pub fn router(state: ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/api/users", get(list))
        .route_layer(from_fn_with_state(
            state.clone(),
            require_permission(perm::USERS_READ),
        ));

    let write = Router::new()
        .route("/api/users", post(create))
        .route("/api/users/{id}", put(update).delete(delete))
        .route_layer(from_fn_with_state(
            state,
            require_permission(perm::USERS_WRITE),
        ));

    read.merge(write)
}

pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<UserResponse>>>> {
    let users = state.user_repository().find_all().await?;
    Ok(ok(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<UserCreate>,
) -> AppResult<Json<AppResponse<UserResponse>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let created = state.user_repository().create(data).await?;
    tracing::info!(email = %created.email, role = %created.role, "User created");
    Ok(ok(UserResponse::from(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<UserResponse>>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = state.user_repository();
    let existing = repo.get_by_id(&id).await?;

    // 至少保留一个可登录的店主
    let loses_owner = existing.role == Role::Owner
        && (data.role.is_some_and(|r| r != Role::Owner) || data.active == Some(false));
    if loses_owner && repo.count_by_role(Role::Owner).await? <= 1 {
        return Err(AppError::BusinessRule(
            "Cannot demote or disable the last owner".to_string(),
        ));
    }

    let updated = repo.update(&id, data).await?;
    Ok(ok(UserResponse::from(updated)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = state.user_repository();
    let existing = repo.get_by_id(&id).await?;

    if existing.role == Role::Owner && repo.count_by_role(Role::Owner).await? <= 1 {
        return Err(AppError::BusinessRule(
            "Cannot delete the last owner".to_string(),
        ));
    }

    repo.delete(&id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(ok_with_message((), "User deleted"))
}
