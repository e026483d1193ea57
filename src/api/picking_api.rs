// ==========================================
// 仓库拣料核对系统 - 拣料会话 API
// ==========================================
// 职责: 会话控制器，编排加载/上传替换/结束会话，并承接操作员录入
// 状态: Empty → Loaded → Finalizing → Empty
//       Empty/Loaded → Replacing → Loaded
// ==========================================
// 约束:
// - 会话锁从不跨 .await 持有
// - 同类远程操作不可重叠，不同控件的本地编辑不受阻塞
// - 每次变更同步写草稿，写失败只记日志不回滚
// ==========================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::line_item::LineItemStore;
use crate::domain::session::{PickingDraft, SessionHeader};
use crate::domain::types::{RemoteOperation, SessionPhase};
use crate::engine::aggregation::{AggregationView, KitRow, PartAggregate};
use crate::engine::allocation::AllocationEngine;
use crate::engine::progress::{ProgressCalculator, ProgressSummary};
use crate::engine::reconcile::DraftReconciler;
use crate::inventory::InventoryService;
use crate::repository::DraftStore;

mod editing;
mod lifecycle;
mod views;

// ==========================================
// PickingSession - 会话内存状态
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PickingSession {
    pub store: LineItemStore,
    pub header: SessionHeader,
    pub show_all_zones: bool,
}

// ==========================================
// SessionSnapshot - 会话只读快照（供界面渲染）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub header: SessionHeader,
    pub show_all_zones: bool,
    pub row_count: usize,
    pub parts: Vec<PartAggregate>,
    pub kits: Vec<KitRow>,
    pub progress: ProgressSummary,
}

// ==========================================
// 远程操作防重入
// ==========================================
struct InFlightGuard<'a> {
    registry: &'a Mutex<HashSet<RemoteOperation>>,
    operation: RemoteOperation,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        match self.registry.lock() {
            Ok(mut set) => {
                set.remove(&self.operation);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(&self.operation);
            }
        }
    }
}

// ==========================================
// PickingApi - 拣料会话 API
// ==========================================

/// 拣料会话API
///
/// 职责：
/// 1. 会话生命周期（加载、上传替换、结束会话）
/// 2. 录入（套件级、零件汇总级、完成开关、表头字段）
/// 3. 派生视图（零件汇总、套件、进度）
/// 4. 草稿自动保存
pub struct PickingApi {
    inventory: Arc<dyn InventoryService>,
    draft_store: Arc<dyn DraftStore>,
    allocation: AllocationEngine,
    aggregation: AggregationView,
    progress: ProgressCalculator,
    reconciler: DraftReconciler,
    session: Mutex<PickingSession>,
    in_flight: Mutex<HashSet<RemoteOperation>>,
}

impl PickingApi {
    /// 创建新的PickingApi实例
    ///
    /// # 参数
    /// - inventory: 外部库存服务
    /// - draft_store: 草稿存储
    /// - show_all_zones: 区域开关初始值
    pub fn new(
        inventory: Arc<dyn InventoryService>,
        draft_store: Arc<dyn DraftStore>,
        show_all_zones: bool,
    ) -> Self {
        Self {
            inventory,
            draft_store,
            allocation: AllocationEngine::new(),
            aggregation: AggregationView::new(),
            progress: ProgressCalculator::new(),
            reconciler: DraftReconciler::new(),
            session: Mutex::new(PickingSession {
                show_all_zones,
                ..PickingSession::default()
            }),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn lock_session(&self) -> ApiResult<MutexGuard<'_, PickingSession>> {
        self.session
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话锁获取失败: {}", e)))
    }

    /// 登记远程操作；同类操作已在进行中时拒绝
    fn begin(&self, operation: RemoteOperation) -> ApiResult<InFlightGuard<'_>> {
        let mut set = self
            .in_flight
            .lock()
            .map_err(|e| ApiError::InternalError(format!("操作锁获取失败: {}", e)))?;
        if !set.insert(operation) {
            tracing::warn!(%operation, "同类操作进行中,拒绝重复提交");
            return Err(ApiError::OperationInProgress { operation });
        }
        Ok(InFlightGuard {
            registry: &self.in_flight,
            operation,
        })
    }

    fn is_in_flight(&self, operation: RemoteOperation) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(&operation))
            .unwrap_or(false)
    }

    /// 同步写草稿（工作集为空时跳过）
    fn autosave(&self, session: &PickingSession) {
        if session.store.is_empty() {
            return;
        }
        let draft = PickingDraft::capture(&session.header, session.store.found_by_unique_id());
        if let Err(e) = self.draft_store.save(&draft) {
            tracing::warn!("草稿保存失败(编辑已生效): {}", e);
        }
    }

    /// 删除草稿（失败只记日志）
    fn discard_draft(&self) {
        if let Err(e) = self.draft_store.clear() {
            tracing::warn!("草稿删除失败: {}", e);
        }
    }

    /// 加锁执行一次本地变更，随后自动保存并返回快照
    fn mutate<F>(&self, f: F) -> ApiResult<SessionSnapshot>
    where
        F: FnOnce(&mut PickingSession) -> ApiResult<()>,
    {
        let mut session = self.lock_session()?;
        f(&mut session)?;
        self.autosave(&session);
        Ok(self.build_snapshot(&session))
    }
}
