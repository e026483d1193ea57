// ==========================================
// 仓库拣料核对系统 - 应用层
// ==========================================
// 职责: 组装配置、仓储、外部服务与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
