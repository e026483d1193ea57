// ==========================================
// 仓库拣料核对系统 - 数量分配引擎
// ==========================================
// 职责: 将操作员录入的数量分摊到受影响的拣料行
// 输入: 工作集 + 录入值 + 当前倍数
// 输出: 新工作集（纯函数，不修改输入）
// ==========================================
// 红线:
// - 录入值越界静默截断，不报错
// - 非数字录入按 0 处理
// - 目标为 0 时比例计算短路为 0
// ==========================================

use crate::domain::line_item::{LineItem, LineItemStore};
use crate::domain::types::Multiplier;
use thiserror::Error;
use tracing::instrument;

#[cfg(test)]
mod tests;

/// 分配引擎错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("套件不存在: {0}")]
    UnknownKit(String),

    #[error("物料编码不存在: {0}")]
    UnknownProductCode(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

// ==========================================
// 录入值解析
// ==========================================

/// 宽松解析数量录入
///
/// 取前导整数部分（"12abc" → 12, "3.7" → 3），无数字时返回 0。
/// 溢出时饱和到 i64 边界。
pub fn parse_quantity_entry(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    match (seen_digit, negative) {
        (false, _) => 0,
        (true, true) => -value,
        (true, false) => value,
    }
}

/// 截断到 [0, max]
pub fn clamp_quantity(requested: i64, max: u64) -> u64 {
    if requested <= 0 {
        0
    } else {
        (requested as u64).min(max)
    }
}

/// floor(child_target * kit_found / kit_target)，kit_target 为 0 时返回 0
fn proportional_share(child_target: u64, kit_found: u64, kit_target: u64) -> u64 {
    if kit_target == 0 {
        return 0;
    }
    let share = u128::from(child_target) * u128::from(kit_found) / u128::from(kit_target);
    u64::try_from(share).unwrap_or(u64::MAX)
}

// ==========================================
// AllocationEngine - 数量分配引擎
// ==========================================
pub struct AllocationEngine {
    // 无状态引擎
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 套件级录入
    ///
    /// 规则:
    /// 1) 录入值截断到 [0, 套件目标]
    /// 2) 套件 found = 截断值
    /// 3) 每个子件 found = floor(子件目标 × 套件found / 套件目标)
    /// 4) 其他行不变
    #[instrument(skip(self, store), fields(kit_id = %kit_id, multiplier = %multiplier))]
    pub fn apply_kit_found(
        &self,
        store: &LineItemStore,
        kit_id: &str,
        requested: i64,
        multiplier: Multiplier,
    ) -> AllocationResult<LineItemStore> {
        let kit_target = store
            .get(kit_id)
            .filter(|i| i.role.is_kit_header())
            .map(|kit| kit.target(multiplier))
            .ok_or_else(|| AllocationError::UnknownKit(kit_id.to_string()))?;

        let kit_found = clamp_quantity(requested, kit_target);

        let mut items: Vec<LineItem> = store.items().to_vec();
        for item in items.iter_mut() {
            if item.unique_id == kit_id && item.role.is_kit_header() {
                item.found = kit_found;
            } else if item.role.is_child_of(kit_id) {
                item.found = proportional_share(item.target(multiplier), kit_found, kit_target);
            }
        }

        tracing::debug!(kit_found, kit_target, "套件录入已分摊到子件");
        Ok(LineItemStore::from_normalized(items))
    }

    /// 零件汇总级录入
    ///
    /// 规则:
    /// 1) 选出同编码的普通零件行（不含套件表头、不含子件）
    /// 2) 录入值截断到 [0, 组目标合计]
    /// 3) 按工作集顺序贪心填满每行
    /// 4) 重新评估所有套件: 子件全部达标 → 套件满额，否则 → 0
    #[instrument(skip(self, store), fields(product_code = %product_code, multiplier = %multiplier))]
    pub fn apply_part_found(
        &self,
        store: &LineItemStore,
        product_code: &str,
        requested: i64,
        multiplier: Multiplier,
    ) -> AllocationResult<LineItemStore> {
        let known = store
            .items()
            .iter()
            .any(|i| !i.role.is_kit_header() && i.product_code == product_code);
        if !known {
            return Err(AllocationError::UnknownProductCode(product_code.to_string()));
        }

        let total_target: u64 = store
            .items()
            .iter()
            .filter(|i| i.role.is_plain_part() && i.product_code == product_code)
            .map(|i| i.target(multiplier))
            .fold(0u64, |acc, t| acc.saturating_add(t));

        let mut remaining = clamp_quantity(requested, total_target);

        let mut items: Vec<LineItem> = store.items().to_vec();
        for item in items
            .iter_mut()
            .filter(|i| i.role.is_plain_part() && i.product_code == product_code)
        {
            let row_target = item.target(multiplier);
            let take = remaining.min(row_target);
            item.found = take;
            remaining -= take;
        }

        settle_kits_from_children(&mut items, multiplier);

        tracing::debug!(total_target, "零件录入已按行贪心分配");
        Ok(LineItemStore::from_normalized(items))
    }

    /// 套件完成开关: 已完成 → 0，否则 → 满额
    pub fn toggle_kit_done(
        &self,
        store: &LineItemStore,
        kit_id: &str,
        multiplier: Multiplier,
    ) -> AllocationResult<LineItemStore> {
        let kit = store
            .get(kit_id)
            .filter(|i| i.role.is_kit_header())
            .ok_or_else(|| AllocationError::UnknownKit(kit_id.to_string()))?;

        let target = kit.target(multiplier);
        let next = if is_done(kit.found, target) { 0 } else { target };
        self.apply_kit_found(store, kit_id, saturating_i64(next), multiplier)
    }

    /// 零件汇总完成开关: 已完成 → 0，否则 → 满额
    ///
    /// 完成判定与汇总视图一致（同编码的全部非套件行，含子件）
    pub fn toggle_part_done(
        &self,
        store: &LineItemStore,
        product_code: &str,
        multiplier: Multiplier,
    ) -> AllocationResult<LineItemStore> {
        let (requested_total, found_total) = store
            .items()
            .iter()
            .filter(|i| !i.role.is_kit_header() && i.product_code == product_code)
            .fold((0u64, 0u64), |(req, found), i| {
                (
                    req.saturating_add(i.quantity_requested),
                    found.saturating_add(i.found),
                )
            });

        let target = multiplier.scale(requested_total);
        let next = if is_done(found_total, target) { 0 } else { target };
        self.apply_part_found(store, product_code, saturating_i64(next), multiplier)
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 完成判定（目标为 0 不算完成）
pub fn is_done(found: u64, target: u64) -> bool {
    target > 0 && found == target
}

fn saturating_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// 由子件状态反推套件 found（全有或全无）
///
/// 没有子件的套件保持不变
fn settle_kits_from_children(items: &mut [LineItem], multiplier: Multiplier) {
    let kit_states: Vec<(usize, bool)> = items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.role.is_kit_header())
        .filter_map(|(idx, kit)| {
            let mut children = items
                .iter()
                .filter(|c| c.role.is_child_of(&kit.unique_id))
                .peekable();
            children.peek()?;
            let all_done = children.all(|c| c.is_at_target(multiplier));
            Some((idx, all_done))
        })
        .collect();

    for (idx, all_done) in kit_states {
        let kit = &mut items[idx];
        kit.found = if all_done { kit.target(multiplier) } else { 0 };
        tracing::trace!(kit_id = %kit.unique_id, found = kit.found, "套件状态已由子件反推");
    }
}
