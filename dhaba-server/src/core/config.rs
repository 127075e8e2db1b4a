use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dhaba | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | REMOTE_CONFIG_URL | (空) | 远程配置服务地址 |
/// | IMAGE_UPLOAD_URL | https://api.imgbb.com/1/upload | 图床上传地址 |
/// | PRINTER_ADDR | (空) | 小票打印机地址 host:9100 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/dhaba HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志、打印缓存等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    /// 远程配置服务地址 (imgbb API key 下发)
    pub remote_config_url: String,
    /// 图床上传地址
    pub image_upload_url: String,
    /// 小票打印机地址 (host:port)，为空时直接落盘
    pub printer_addr: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dhaba".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            remote_config_url: std::env::var("REMOTE_CONFIG_URL").unwrap_or_default(),
            image_upload_url: std::env::var("IMAGE_UPLOAD_URL")
                .unwrap_or_else(|_| "https://api.imgbb.com/1/upload".into()),
            printer_addr: std::env::var("PRINTER_ADDR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 离线队列文件 (work_dir/queue/pending.redb)
    pub fn queue_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("queue").join("pending.redb")
    }

    /// 打印缓存目录 (work_dir/spool)
    pub fn spool_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("spool")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.queue_path().parent().unwrap_or(&PathBuf::from(&self.work_dir)))?;
        std::fs::create_dir_all(self.spool_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
