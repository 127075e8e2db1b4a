use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::auth::{JwtService, Role};
use crate::billing::CheckoutService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::UserCreate;
use crate::db::repository::{
    DiningTableRepository, OrderRepository, ProductRepository, RestaurantRepository,
    UserRepository,
};
use crate::printing::PrintService;
use crate::services::{ImageUploadService, OfflineQueue, RemoteConfigService};
use crate::tables::{Rates, TableManager};
use crate::utils::{AppError, AppResult};

/// 离线队列重放间隔
const QUEUE_DRAIN_INTERVAL: Duration = Duration::from_secs(30);

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是整个 POS 服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | table_manager | Arc<TableManager> | 桌台会话注册表 |
/// | checkout | CheckoutService | 结账持久化 |
/// | offline_queue | OfflineQueue | 失败订单重放队列 |
/// | print_service | Arc<PrintService> | 小票/厨房单打印 |
/// | rates | Arc<RwLock<Rates>> | 税率/服务费缓存 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    jwt_service: Arc<JwtService>,
    /// 桌台会话注册表
    table_manager: Arc<TableManager>,
    /// 结账持久化服务
    checkout: CheckoutService,
    /// 离线订单队列
    offline_queue: OfflineQueue,
    /// 打印服务
    print_service: Arc<PrintService>,
    /// 远程配置客户端
    remote_config: Arc<RemoteConfigService>,
    /// 图片上传客户端
    image_upload: Arc<ImageUploadService>,
    /// 当前税率缓存，设置更新时刷新
    rates: Arc<RwLock<Rates>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/dhaba.db)
    /// 3. 离线队列 (work_dir/queue/pending.redb)
    /// 4. 各服务 (JWT, 打印, 远程配置, 图片上传)
    /// 5. 从数据库预热桌台注册表和税率缓存
    ///
    /// 预热完成后服务才开始监听，接口不会看到空的桌台列表。
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("dhaba.db");
        let db_service = DbService::new(&db_path).await?;

        let offline_queue = OfflineQueue::open(config.queue_path())
            .map_err(|e| AppError::Internal(format!("Failed to open offline queue: {e}")))?;

        Self::build(config.clone(), db_service, offline_queue).await
    }

    /// 内存数据库初始化 (测试用)
    pub async fn initialize_in_memory(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_service = DbService::new_in_memory().await?;
        let offline_queue = OfflineQueue::open_in_memory()
            .map_err(|e| AppError::Internal(format!("Failed to open offline queue: {e}")))?;

        Self::build(config.clone(), db_service, offline_queue).await
    }

    async fn build(
        config: Config,
        db_service: DbService,
        offline_queue: OfflineQueue,
    ) -> AppResult<Self> {
        let db = db_service.db();
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        let checkout = CheckoutService::new(OrderRepository::new(db.clone()), offline_queue.clone());
        let print_service = Arc::new(PrintService::new(
            config.printer_addr.as_deref(),
            config.spool_dir(),
        )?);
        let remote_config = Arc::new(RemoteConfigService::new(config.remote_config_url.clone()));
        let image_upload = Arc::new(ImageUploadService::new(config.image_upload_url.clone()));

        let state = Self {
            config,
            db,
            jwt_service,
            table_manager: Arc::new(TableManager::new()),
            checkout,
            offline_queue,
            print_service,
            remote_config,
            image_upload,
            rates: Arc::new(RwLock::new(Rates::default())),
        };

        state.warm_up().await?;
        Ok(state)
    }

    /// 数据库预热: 设置文档、桌台注册表、税率缓存、初始店主账号
    async fn warm_up(&self) -> AppResult<()> {
        self.restaurant_repository().ensure_initialized().await?;

        for table in self.dining_table_repository().find_all().await? {
            if let Some(id) = &table.id {
                self.table_manager.register(&id.to_string(), &table.name);
            }
        }
        tracing::info!(tables = self.table_manager.len(), "Table registry warmed up");

        self.refresh_rates().await?;
        self.ensure_owner_account().await?;
        Ok(())
    }

    /// 首次启动时创建店主账号
    ///
    /// 默认凭据来自 OWNER_EMAIL / OWNER_PASSWORD 环境变量，
    /// 未设置时跳过 (已有店主的库也跳过)。
    async fn ensure_owner_account(&self) -> AppResult<()> {
        let users = self.user_repository();
        if users.count_by_role(Role::Owner).await? > 0 {
            return Ok(());
        }
        let (Ok(email), Ok(password)) = (
            std::env::var("OWNER_EMAIL"),
            std::env::var("OWNER_PASSWORD"),
        ) else {
            tracing::warn!("No owner account and OWNER_EMAIL/OWNER_PASSWORD not set");
            return Ok(());
        };

        users
            .create(UserCreate {
                name: "Owner".to_string(),
                email,
                password,
                role: Role::Owner,
            })
            .await?;
        tracing::info!("Initial owner account created");
        Ok(())
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 离线队列重放 (每 30s)
    pub fn start_background_tasks(&self, shutdown: CancellationToken) {
        let checkout = self.checkout.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(QUEUE_DRAIN_INTERVAL);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("Queue drain task stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let replayed = checkout.drain_offline_queue().await;
                        if replayed > 0 {
                            tracing::info!(replayed, "Offline orders replayed");
                        }
                    }
                }
            }
        });
    }

    // ========== 服务访问器 ==========

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn table_manager(&self) -> &TableManager {
        &self.table_manager
    }

    pub fn checkout_service(&self) -> &CheckoutService {
        &self.checkout
    }

    pub fn print_service(&self) -> &PrintService {
        &self.print_service
    }

    pub fn remote_config(&self) -> &RemoteConfigService {
        &self.remote_config
    }

    pub fn image_upload(&self) -> &ImageUploadService {
        &self.image_upload
    }

    pub fn offline_queue(&self) -> &OfflineQueue {
        &self.offline_queue
    }

    // ========== 仓储访问器 ==========

    pub fn product_repository(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    pub fn dining_table_repository(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.db.clone())
    }

    pub fn order_repository(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    pub fn user_repository(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn restaurant_repository(&self) -> RestaurantRepository {
        RestaurantRepository::new(self.db.clone())
    }

    // ========== 税率缓存 ==========

    /// 当前生效的税率
    pub fn rates(&self) -> Rates {
        *self.rates.read()
    }

    /// 重新读取设置，刷新税率缓存并重算未结账桌台
    pub async fn refresh_rates(&self) -> AppResult<()> {
        let settings = self.restaurant_repository().get().await?;
        let rates = Rates {
            gst_rate: settings.gst_rate,
            service_rate: settings.service_rate,
        };
        *self.rates.write() = rates;
        self.table_manager.recompute_all(rates);
        Ok(())
    }
}
