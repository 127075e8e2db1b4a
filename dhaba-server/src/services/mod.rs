//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`OfflineQueue`] - 结账失败订单的本地重放队列 (redb)
//! - [`RemoteConfigService`] - 远程配置拉取 (图床 API key)
//! - [`ImageUploadService`] - 菜品图片上传

pub mod image_upload;
pub mod offline_queue;
pub mod remote_config;

pub use image_upload::{ImageUploadService, UploadedImage};
pub use offline_queue::{OfflineQueue, StorageError, StorageResult};
pub use remote_config::RemoteConfigService;
