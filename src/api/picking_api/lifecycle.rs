use super::*;

use crate::domain::session::{FinalizePayload, FinalizeReceipt};
use crate::domain::types::Multiplier;

impl PickingApi {
    // ==========================================
    // 会话生命周期接口
    // ==========================================

    /// 加载当前订单清单并与本地草稿合并
    ///
    /// # 返回
    /// - Ok(SessionSnapshot): 合并后的会话快照（清单为空时为 Empty）
    /// - Err(ApiError::RemoteCallFailed): 获取失败，会话保持原状
    ///
    /// # 说明
    /// - 草稿在会话锁内读取并合并，合并结果一次性替换会话状态
    /// - 迟到的加载响应重复合并也是安全的（合并幂等）
    #[tracing::instrument(skip(self))]
    pub async fn load_session(&self) -> ApiResult<SessionSnapshot> {
        let _guard = self.begin(RemoteOperation::Load)?;

        let records = self
            .inventory
            .fetch_current_items()
            .await
            .map_err(|e| {
                tracing::error!("加载清单失败: {}", e);
                ApiError::remote(RemoteOperation::Load, e)
            })?;

        let mut session = self.lock_session()?;

        let draft = match self.draft_store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("草稿读取失败,按无草稿处理: {}", e);
                None
            }
        };
        if let Some(stored) = &draft {
            tracing::info!(saved_at = %stored.saved_at, "发现本地草稿");
        }

        let reconciled = self
            .reconciler
            .reconcile(records, draft.as_ref().map(|d| &d.draft));
        session.store = reconciled.store;
        session.header = reconciled.header;

        tracing::info!(
            rows = session.store.len(),
            opd = %session.header.global_opd,
            multiplier = %session.header.multiplier,
            "拣料清单已加载"
        );

        self.autosave(&session);
        Ok(self.build_snapshot(&session))
    }

    /// 上传结构文件并替换当前清单
    ///
    /// # 参数
    /// - file_name: 原始文件名
    /// - content: 文件内容
    ///
    /// # 返回
    /// - Ok(SessionSnapshot): 新清单的会话快照
    /// - Err(ApiError::RemoteCallFailed): 上传失败，当前清单与草稿保持不变
    ///
    /// # 说明
    /// - 成功后丢弃旧草稿，found 全部归零
    /// - globalOpd 取新清单第一行，multiplier 重置为 1，备注保留
    #[tracing::instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn upload_structure(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> ApiResult<SessionSnapshot> {
        if file_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件名不能为空".to_string()));
        }

        let _guard = self.begin(RemoteOperation::Upload)?;

        let records = self
            .inventory
            .upload_structure(file_name, content)
            .await
            .map_err(|e| {
                tracing::error!("结构文件处理失败: {}", e);
                ApiError::remote(RemoteOperation::Upload, e)
            })?;

        let mut session = self.lock_session()?;
        self.discard_draft();

        let reconciled = self.reconciler.reconcile(records, None);
        let opd_comment = std::mem::take(&mut session.header.opd_comment);
        session.store = reconciled.store;
        session.header = SessionHeader {
            global_opd: reconciled.header.global_opd,
            opd_comment,
            multiplier: Multiplier::ONE,
        };

        tracing::info!(
            rows = session.store.len(),
            opd = %session.header.global_opd,
            "结构文件已替换当前清单"
        );

        self.autosave(&session);
        Ok(self.build_snapshot(&session))
    }

    /// 结束会话并提交拣料结果
    ///
    /// # 参数
    /// - confirmed: 操作员是否已确认（见 finalize_prompt）
    ///
    /// # 返回
    /// - Ok(FinalizeReceipt): 服务端回执
    /// - Err(ApiError::ConfirmationRequired): 未确认，不发请求
    /// - Err(ApiError::EmptySession): 无清单可提交
    /// - Err(ApiError::RemoteCallFailed): 提交失败，清单、表头与草稿均保持不变
    #[tracing::instrument(skip(self))]
    pub async fn finalize_session(&self, confirmed: bool) -> ApiResult<FinalizeReceipt> {
        if !confirmed {
            return Err(ApiError::ConfirmationRequired);
        }

        let _guard = self.begin(RemoteOperation::Finalize)?;

        // 提交时刻的快照
        let payload = {
            let session = self.lock_session()?;
            if session.store.is_empty() {
                return Err(ApiError::EmptySession);
            }
            FinalizePayload {
                global_opd: session.header.global_opd.clone(),
                opd_comment: session.header.opd_comment.clone(),
                multiplier: session.header.multiplier,
                items_by_unique_id: session.store.found_by_unique_id(),
            }
        };

        let receipt = self.inventory.finalize(&payload).await.map_err(|e| {
            tracing::error!("结束会话失败: {}", e);
            ApiError::remote(RemoteOperation::Finalize, e)
        })?;

        let mut session = self.lock_session()?;
        session.store = LineItemStore::new();
        session.header = SessionHeader::default();
        self.discard_draft();

        tracing::info!(
            opd = %payload.global_opd,
            rows = payload.items_by_unique_id.len(),
            message = %receipt.message,
            "会话已结束"
        );
        Ok(receipt)
    }

    /// 结束会话前的确认提示语（当前语言）
    pub fn finalize_prompt(&self) -> String {
        crate::i18n::t("picking.finalize_confirm")
    }

    /// 结束会话成功后的提示语（附带服务端回执）
    pub fn finalize_notice(&self, receipt: &FinalizeReceipt) -> String {
        crate::i18n::t_with_args(
            "picking.finalize_done",
            &[("message", receipt.message.as_str())],
        )
    }
}
