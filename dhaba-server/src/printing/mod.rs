//! Printing Module
//!
//! Receipt and kitchen ticket rendering plus transport dispatch.
//!
//! - **renderer**: [`ReceiptRenderer`] — 48 列小票排版
//! - **kot**: [`KotRenderer`] — 厨房单
//! - **service**: [`PrintService`] — 渲染 + 网络/落盘降级

pub mod kot;
pub mod renderer;
pub mod service;

pub use kot::KotRenderer;
pub use renderer::ReceiptRenderer;
pub use service::PrintService;
