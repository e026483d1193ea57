// ==========================================
// 仓库拣料核对系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod line_item;
pub mod session;
pub mod types;

// 重导出核心类型
pub use line_item::{LineItem, LineItemRecord, LineItemStore};
pub use session::{FinalizePayload, FinalizeReceipt, PickingDraft, SessionHeader};
pub use types::{ItemRole, Multiplier, RemoteOperation, SessionPhase};
