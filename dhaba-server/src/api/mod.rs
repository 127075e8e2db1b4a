//! API Routes
//!
//! 所有 HTTP 路由的注册与中间件装配。
//!
//! # 路由分组
//!
//! | 前缀 | 模块 | 权限 |
//! |------|------|------|
//! | /api/health | health | 公共 |
//! | /api/auth | auth | login/register/join 公共，其余需认证 |
//! | /api/products | products | products:read / products:write |
//! | /api/tables | tables | tables:* (CRUD 需 settings:write) |
//! | /api/orders | orders | orders:* |
//! | /api/users | users | users:* |
//! | /api/settings | settings | settings:* |
//! | /api/upload | upload | products:write |
//! | /api/print | print | print:execute |

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

pub mod auth;
pub mod health;
pub mod orders;
pub mod print;
pub mod products;
pub mod settings;
pub mod tables;
pub mod upload;
pub mod users;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the fully configured application router
///
/// 认证中间件在最外层: 除公共路由外，所有 /api/ 请求先过 JWT 校验。
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router(state.clone()))
        .merge(tables::router(state.clone()))
        .merge(orders::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(settings::router(state.clone()))
        .merge(upload::router(state.clone()))
        .merge(print::router(state.clone()))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT 认证，注入 CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state)
}
