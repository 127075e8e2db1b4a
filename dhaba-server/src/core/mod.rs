//! Core Module
//!
//! 服务器核心：配置、状态、HTTP 启动。

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
