// ==========================================
// 仓库拣料核对系统 - 外部库存/历史服务
// ==========================================
// 职责: 获取权威清单、上传结构文件、提交拣料结果
// ==========================================

pub mod client;
pub mod error;
pub mod http;

pub use client::InventoryService;
pub use error::{InventoryError, InventoryResult};
pub use http::HttpInventoryClient;
