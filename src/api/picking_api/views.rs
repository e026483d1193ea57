use super::*;

impl PickingApi {
    // ==========================================
    // 派生视图接口（每次重新计算）
    // ==========================================

    /// 当前会话快照
    pub fn snapshot(&self) -> ApiResult<SessionSnapshot> {
        let session = self.lock_session()?;
        Ok(self.build_snapshot(&session))
    }

    /// 当前进度
    pub fn progress(&self) -> ApiResult<ProgressSummary> {
        let session = self.lock_session()?;
        let parts = self
            .aggregation
            .parts_by_code(&session.store, session.header.multiplier);
        Ok(self.progress.compute(&parts, session.show_all_zones))
    }

    /// 会话阶段
    ///
    /// 远程操作进行中时优先反映 Finalizing / Replacing
    pub fn phase(&self) -> ApiResult<SessionPhase> {
        let session = self.lock_session()?;
        Ok(self.derive_phase(&session))
    }

    fn derive_phase(&self, session: &PickingSession) -> SessionPhase {
        if self.is_in_flight(RemoteOperation::Finalize) {
            SessionPhase::Finalizing
        } else if self.is_in_flight(RemoteOperation::Upload) {
            SessionPhase::Replacing
        } else if session.store.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Loaded
        }
    }

    pub(super) fn build_snapshot(&self, session: &PickingSession) -> SessionSnapshot {
        let multiplier = session.header.multiplier;
        let all_parts = self.aggregation.parts_by_code(&session.store, multiplier);
        let progress = self.progress.compute(&all_parts, session.show_all_zones);

        let parts = all_parts
            .into_iter()
            .filter(|p| crate::engine::aggregation::is_visible(p.in_scope, session.show_all_zones))
            .collect();
        let kits = self
            .aggregation
            .visible_kits(&session.store, multiplier, session.show_all_zones);

        SessionSnapshot {
            phase: self.derive_phase(session),
            header: session.header.clone(),
            show_all_zones: session.show_all_zones,
            row_count: session.store.len(),
            parts,
            kits,
            progress,
        }
    }
}
