use super::*;

use crate::domain::types::Multiplier;
use crate::engine::allocation::parse_quantity_entry;

impl PickingApi {
    // ==========================================
    // 数量录入接口
    // ==========================================

    /// 套件级录入
    ///
    /// # 参数
    /// - kit_id: 套件行 uniqueId
    /// - raw: 操作员录入文本（非数字按 0，越界截断）
    pub fn set_kit_found(&self, kit_id: &str, raw: &str) -> ApiResult<SessionSnapshot> {
        let requested = parse_quantity_entry(raw);
        self.mutate(|session| {
            session.store = self.allocation.apply_kit_found(
                &session.store,
                kit_id,
                requested,
                session.header.multiplier,
            )?;
            Ok(())
        })
    }

    /// 零件汇总级录入
    ///
    /// # 参数
    /// - product_code: 物料编码（原始编码，非展示格式）
    /// - raw: 操作员录入文本（非数字按 0，越界截断）
    pub fn set_part_found(&self, product_code: &str, raw: &str) -> ApiResult<SessionSnapshot> {
        let requested = parse_quantity_entry(raw);
        self.mutate(|session| {
            session.store = self.allocation.apply_part_found(
                &session.store,
                product_code,
                requested,
                session.header.multiplier,
            )?;
            Ok(())
        })
    }

    /// 套件完成开关
    pub fn toggle_kit_done(&self, kit_id: &str) -> ApiResult<SessionSnapshot> {
        self.mutate(|session| {
            session.store =
                self.allocation
                    .toggle_kit_done(&session.store, kit_id, session.header.multiplier)?;
            Ok(())
        })
    }

    /// 零件汇总完成开关
    pub fn toggle_part_done(&self, product_code: &str) -> ApiResult<SessionSnapshot> {
        self.mutate(|session| {
            session.store = self.allocation.toggle_part_done(
                &session.store,
                product_code,
                session.header.multiplier,
            )?;
            Ok(())
        })
    }

    // ==========================================
    // 表头接口
    // ==========================================

    /// 修改订单标签
    pub fn set_global_opd(&self, value: &str) -> ApiResult<SessionSnapshot> {
        self.mutate(|session| {
            session.header.global_opd = value.to_string();
            Ok(())
        })
    }

    /// 修改缺料备注
    pub fn set_opd_comment(&self, value: &str) -> ApiResult<SessionSnapshot> {
        self.mutate(|session| {
            session.header.opd_comment = value.to_string();
            Ok(())
        })
    }

    /// 修改全局倍数
    ///
    /// 非数字或小于 1 的录入按 1 处理。已录入的 found 不随倍数重算，
    /// 只有之后的分配操作按新目标计算。
    pub fn set_multiplier(&self, raw: &str) -> ApiResult<SessionSnapshot> {
        let multiplier = Multiplier::parse_lenient(raw);
        self.mutate(|session| {
            if session.header.multiplier != multiplier {
                tracing::info!(
                    from = %session.header.multiplier,
                    to = %multiplier,
                    "倍数已变更,已录入数量不重算"
                );
            }
            session.header.multiplier = multiplier;
            Ok(())
        })
    }

    /// 切换区域开关（仅影响视图与进度，不写草稿）
    pub fn set_show_all_zones(&self, show_all_zones: bool) -> ApiResult<SessionSnapshot> {
        let mut session = self.lock_session()?;
        session.show_all_zones = show_all_zones;
        Ok(self.build_snapshot(&session))
    }
}
