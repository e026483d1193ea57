// ==========================================
// 仓库拣料核对系统 - 草稿对账
// ==========================================
// 职责: 将本地草稿与库存服务的权威清单合并
// - 服务端清单决定行的身份与结构
// - 草稿决定进行中的 found 数量与表头
// ==========================================

use crate::domain::line_item::{LineItemRecord, LineItemStore};
use crate::domain::session::{PickingDraft, SessionHeader};
use crate::domain::types::Multiplier;
use tracing::instrument;

/// 对账结果（一次性整体应用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSession {
    pub store: LineItemStore,
    pub header: SessionHeader,
}

pub struct DraftReconciler {
    // 无状态
}

impl DraftReconciler {
    pub fn new() -> Self {
        Self {}
    }

    /// 合并草稿与权威清单
    ///
    /// 规则:
    /// - 行的 found 原样取草稿中同 uniqueId 的值，缺省为 0
    /// - 不按当前目标截断：倍数调小后超出目标的已录入值同样保留
    /// - 草稿中不存在于清单的 uniqueId 直接丢弃
    /// - globalOpd: 草稿非空则恢复，否则取第一行订单号
    /// - multiplier: 草稿有值则恢复，否则为 1
    /// - opdComment: 草稿有值则恢复
    #[instrument(skip_all, fields(rows = records.len(), has_draft = draft.is_some()))]
    pub fn reconcile(
        &self,
        records: Vec<LineItemRecord>,
        draft: Option<&PickingDraft>,
    ) -> ReconciledSession {
        let store = LineItemStore::from_records(records);

        let multiplier = draft
            .and_then(|d| d.multiplier)
            .unwrap_or(Multiplier::ONE);

        let global_opd = draft
            .map(|d| d.global_opd.trim())
            .filter(|opd| !opd.is_empty())
            .map(str::to_string)
            .or_else(|| store.first_opd().map(str::to_string))
            .unwrap_or_default();

        let opd_comment = draft.map(|d| d.opd_comment.clone()).unwrap_or_default();

        let store = match draft {
            Some(d) => {
                let mut restored = 0usize;
                let items = store
                    .into_items()
                    .into_iter()
                    .map(|mut item| {
                        if let Some(found) = d.found_by_unique_id.get(&item.unique_id) {
                            item.found = *found;
                            restored += 1;
                        }
                        item
                    })
                    .collect();
                tracing::info!(
                    restored,
                    dropped = d.found_by_unique_id.len().saturating_sub(restored),
                    "草稿数量已合并"
                );
                LineItemStore::from_normalized(items)
            }
            None => store,
        };

        ReconciledSession {
            store,
            header: SessionHeader {
                global_opd,
                opd_comment,
                multiplier,
            },
        }
    }
}

impl Default for DraftReconciler {
    fn default() -> Self {
        Self::new()
    }
}
