//! Dhaba POS Server - 单店餐厅收银服务
//!
//! # 架构概述
//!
//! 嵌入式单进程服务，面向收银台/平板浏览器提供 REST API：
//!
//! - **商品目录** (`db`): 嵌入式 SurrealDB 存储商品、订单、员工、设置
//! - **桌台会话** (`tables`): 内存会话注册表，开台/点单/并台/分账
//! - **结账** (`billing`): 一次性落单 + redb 离线队列兜底
//! - **认证** (`auth`): JWT + Argon2 认证，角色静态权限
//! - **打印** (`printing`): ESC/POS 小票与厨房单，网络/落盘降级
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! dhaba-server/src/
//! ├── core/          # 配置、状态、HTTP 启动
//! ├── auth/          # JWT 认证、角色权限
//! ├── api/           # HTTP 路由和处理器
//! ├── tables/        # 桌台会话、金额计算
//! ├── billing/       # 购物车、结账
//! ├── printing/      # 小票/厨房单渲染与打印
//! ├── services/      # 离线队列、远程配置、图床
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod printing;
pub mod services;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use billing::{Cart, CheckoutService};
pub use core::{Config, Server, ServerState};
pub use tables::{TableManager, TableSession};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: dotenv + 日志
///
/// 生产环境写滚动日志文件，其余环境输出到 stdout。
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if config.is_production() {
        config.ensure_work_dir_structure()?;
        let log_dir = config.log_dir();
        init_logger_with_file(
            std::env::var("LOG_LEVEL").ok().as_deref(),
            log_dir.to_str(),
        );
    } else {
        init_logger_with_file(std::env::var("LOG_LEVEL").ok().as_deref(), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  __          __
   / __ \/ /_  ____ _/ /_  ____ _
  / / / / __ \/ __ `/ __ \/ __ `/
 / /_/ / / / / /_/ / /_/ / /_/ /
/_____/_/ /_/\__,_/_.___/\__,_/
           P O S
    "#
    );
}
