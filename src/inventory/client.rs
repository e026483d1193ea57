// ==========================================
// 仓库拣料核对系统 - 库存服务接口
// ==========================================
// 职责: 定义会话控制器依赖的外部库存/历史服务
// 实现者: HttpInventoryClient（生产），测试中的内存替身
// ==========================================

use crate::domain::line_item::LineItemRecord;
use crate::domain::session::{FinalizePayload, FinalizeReceipt};
use crate::inventory::error::InventoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait InventoryService: Send + Sync {
    /// 获取当前订单的权威拣料清单（保持服务端顺序）
    async fn fetch_current_items(&self) -> InventoryResult<Vec<LineItemRecord>>;

    /// 上传结构文件，返回解析后的新清单
    async fn upload_structure(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> InventoryResult<Vec<LineItemRecord>>;

    /// 提交拣料结果
    async fn finalize(&self, payload: &FinalizePayload) -> InventoryResult<FinalizeReceipt>;
}
