// ==========================================
// 仓库拣料核对系统 - 引擎层
// ==========================================
// 职责: 实现拣料业务规则，不访问存储、不发网络请求
// 红线: 所有引擎均为纯函数，输入工作集，输出新工作集/派生视图
// ==========================================

pub mod aggregation;
pub mod allocation;
pub mod product_code;
pub mod progress;
pub mod reconcile;

// 重导出核心引擎
pub use aggregation::{AggregationView, KitRow, PartAggregate};
pub use allocation::{AllocationEngine, AllocationError, AllocationResult};
pub use product_code::format_product_code;
pub use progress::{ProgressCalculator, ProgressSummary};
pub use reconcile::{DraftReconciler, ReconciledSession};
