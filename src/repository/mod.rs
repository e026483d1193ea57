// ==========================================
// 仓库拣料核对系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供本地持久化接口，屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod draft_repo;
pub mod error;

// 重导出核心仓储
pub use draft_repo::{DraftRepository, DraftStore, StoredDraft, DRAFT_KEY};
pub use error::{RepositoryError, RepositoryResult};
