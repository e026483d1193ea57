// ==========================================
// 仓库拣料核对系统 - API 层
// ==========================================
// 职责: 提供会话级业务接口，供界面/命令行调用
// ==========================================

pub mod error;
pub mod picking_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use picking_api::{PickingApi, PickingSession, SessionSnapshot};
