//! Authentication Routes
//!
//! - /api/auth/login, /api/auth/register, /api/auth/join: public
//! - /api/auth/me, /api/auth/logout: protected

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/join", post(join))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information returned after login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub permissions: Vec<String>,
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. Lookup and
/// password failures share one error message so emails cannot be
/// enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let user = state
        .user_repository()
        .find_by_email(&req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !user.active {
        return Err(AppError::Forbidden("Account has been disabled".to_string()));
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        return Err(AppError::invalid_credentials());
    }

    let response = issue_session(&state, user)?;
    tracing::info!(email = %response.user.email, role = %response.user.role, "User logged in");
    Ok(ok(response))
}

/// First-boot owner registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Staff self-registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Invite code from the restaurant settings screen
    pub join_code: String,
}

/// First-boot owner registration
///
/// Only available while no owner account exists. Once the first owner
/// is created this endpoint rejects everything; further accounts go
/// through user management or the join code.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let users = state.user_repository();
    if users.count_by_role(Role::Owner).await? > 0 {
        return Err(AppError::Forbidden(
            "Registration is closed, ask the owner for an invite code".to_string(),
        ));
    }

    let user = users
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: Role::Owner,
        })
        .await?;

    let response = issue_session(&state, user)?;
    tracing::info!(email = %response.user.email, "Owner account registered");
    Ok(ok(response))
}

/// Join the restaurant as staff with an invite code
pub async fn join(
    State(state): State<ServerState>,
    Json(req): Json<JoinRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let settings = state.restaurant_repository().get().await?;
    if req.join_code != settings.join_code {
        return Err(AppError::Forbidden("Invalid join code".to_string()));
    }

    let user = state
        .user_repository()
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: Role::Staff,
        })
        .await?;

    let response = issue_session(&state, user)?;
    tracing::info!(email = %response.user.email, "Staff joined with invite code");
    Ok(ok(response))
}

/// Mint a token and response body for a freshly authenticated user
fn issue_session(state: &ServerState, user: User) -> AppResult<LoginResponse> {
    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .jwt_service()
        .generate_token(&user_id, &user.email, user.role)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            permissions: user.role.permissions().iter().map(|p| p.to_string()).collect(),
        },
    })
}

/// Get current user info
///
/// Reads the user document fresh so a role change shows up without
/// re-login.
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<UserInfo>>> {
    let stored = state.user_repository().get_by_id(&user.id).await?;

    Ok(ok(UserInfo {
        id: user.id,
        name: stored.name,
        email: stored.email,
        role: stored.role.to_string(),
        permissions: stored
            .role
            .permissions()
            .iter()
            .map(|p| p.to_string())
            .collect(),
    }))
}

/// Logout handler (client-side token invalidation)
///
/// JWTs are stateless; this endpoint only logs the event.
pub async fn logout(user: CurrentUser) -> AppResult<Json<AppResponse<()>>> {
    tracing::info!(user_id = %user.id, email = %user.email, "User logged out");
    Ok(ok(()))
}
