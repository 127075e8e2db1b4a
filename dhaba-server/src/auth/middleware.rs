//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health` (存活探测)
/// - `/api/auth/login` (登录接口)
/// - `/api/auth/register` / `/api/auth/join` (首次注册/邀请码入职)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    let is_public_api_route = path == "/api/health"
        || path == "/api/auth/login"
        || path == "/api/auth/register"
        || path == "/api/auth/join";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service().validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

/// 权限检查中间件 - 要求特定权限
///
/// 每次检查都从数据库重新读取用户文档: 角色变更对下一个
/// 受保护的操作立即生效，无需等待令牌过期。
///
/// # 用法
///
/// ```ignore
/// Router::new()
///     .route("/api/products", post(handler::create))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         require_permission(perm::PRODUCTS_WRITE),
///     ));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    State<ServerState>,
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |State(state): State<ServerState>, req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::Unauthorized)?;

            // 实时读库，令牌里的角色可能已过期
            let stored = state
                .user_repository()
                .get_by_id(&user.id)
                .await
                .map_err(|_| AppError::Unauthorized)?;

            if !stored.active {
                tracing::warn!(user_id = %user.id, "Disabled account attempted access");
                return Err(AppError::Unauthorized);
            }

            if !stored.role.has_permission(permission) {
                tracing::warn!(
                    user_id = %user.id,
                    role = %stored.role,
                    required = permission,
                    "Permission denied"
                );
                return Err(AppError::Forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 从请求中提取 CurrentUser 的扩展方法
pub trait CurrentUserExt {
    /// 从请求扩展中获取 CurrentUser
    ///
    /// 未认证返回 401
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or(AppError::Unauthorized)
    }
}
