// ==========================================
// 仓库拣料核对系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::PickingApi;
use crate::config::config_manager::{ConfigManager, PickingSettings};
use crate::db::open_shared_connection;
use crate::inventory::{HttpInventoryClient, InventoryService};
use crate::repository::DraftRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SMARTPICK_DB_PATH";

/// 应用状态
///
/// 包含API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时读取的配置
    pub settings: PickingSettings,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 拣料会话API
    pub picking_api: Arc<PickingApi>,
}

impl AppState {
    /// 创建新的AppState实例（使用配置中的 HTTP 库存服务）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 使用指定库存服务创建AppState（测试或替换后端时使用）
    pub fn with_inventory(
        db_path: String,
        inventory: Arc<dyn InventoryService>,
    ) -> Result<Self, String> {
        Self::build(db_path, Some(inventory))
    }

    fn build(
        db_path: String,
        inventory: Option<Arc<dyn InventoryService>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_shared_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = config_manager
            .load_settings()
            .map_err(|e| format!("读取配置失败: {}", e))?;
        crate::i18n::set_locale(&settings.locale);

        // ==========================================
        // 外部服务与仓储
        // ==========================================
        let inventory: Arc<dyn InventoryService> = match inventory {
            Some(inv) => inv,
            None => Arc::new(
                HttpInventoryClient::new(&settings.inventory_base_url, settings.inventory_timeout)
                    .map_err(|e| format!("无法创建库存服务客户端: {}", e))?,
            ),
        };
        let draft_repo = Arc::new(DraftRepository::new(conn));

        // ==========================================
        // API
        // ==========================================
        let picking_api = Arc::new(PickingApi::new(
            inventory,
            draft_repo,
            settings.show_all_zones,
        ));

        tracing::info!(
            base_url = %settings.inventory_base_url,
            locale = %settings.locale,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            settings,
            config_manager,
            picking_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 SMARTPICK_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./smartpick.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("smartpick-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("smartpick");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("smartpick.db");
    }

    path.to_string_lossy().to_string()
}
