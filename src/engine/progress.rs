// ==========================================
// 仓库拣料核对系统 - 进度计算器
// ==========================================
// 职责: 基于零件汇总视图计算完成百分比
// 红线: 目标合计为 0 时百分比为 0，不做除法
// ==========================================

use crate::engine::aggregation::{is_visible, PartAggregate};
use serde::{Deserialize, Serialize};

/// 进度汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_target: u64,
    pub total_found: u64,
    pub percentage: u64,
}

pub struct ProgressCalculator {
    // 无状态
}

impl ProgressCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算进度
    ///
    /// 只统计 effective_target > 0 且可见的汇总行；套件不单独计入
    ///（套件完成度已通过其子件体现在零件汇总中）。
    pub fn compute(&self, parts: &[PartAggregate], show_all_zones: bool) -> ProgressSummary {
        let (total_target, total_found) = parts
            .iter()
            .filter(|p| p.effective_target > 0 && is_visible(p.in_scope, show_all_zones))
            .fold((0u64, 0u64), |(target, found), p| {
                (
                    target.saturating_add(p.effective_target),
                    found.saturating_add(p.found_total),
                )
            });

        ProgressSummary {
            total_target,
            total_found,
            percentage: rounded_percentage(total_found, total_target),
        }
    }
}

impl Default for ProgressCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// round(100 × found / target)，半数向上取整；target 为 0 时返回 0
pub fn rounded_percentage(found: u64, target: u64) -> u64 {
    if target == 0 {
        return 0;
    }
    let numerator = 200 * u128::from(found) + u128::from(target);
    let denominator = 2 * u128::from(target);
    u64::try_from(numerator / denominator).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(code: &str, target: u64, found: u64, in_scope: bool) -> PartAggregate {
        PartAggregate {
            code: code.to_string(),
            display_code: code.to_string(),
            description: String::new(),
            zone: String::new(),
            requested_total: target,
            found_total: found,
            in_scope,
            effective_target: target,
            is_done: false,
        }
    }

    #[test]
    fn test_rounded_percentage() {
        assert_eq!(rounded_percentage(0, 0), 0);
        assert_eq!(rounded_percentage(5, 0), 0);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13); // 12.5 → 13
        assert_eq!(rounded_percentage(10, 10), 100);
    }

    #[test]
    fn test_progress_scoped_to_visible_zones() {
        let calc = ProgressCalculator::new();
        let parts = vec![agg("A", 10, 5, true), agg("B", 30, 30, false)];

        let scoped = calc.compute(&parts, false);
        assert_eq!(scoped.total_target, 10);
        assert_eq!(scoped.total_found, 5);
        assert_eq!(scoped.percentage, 50);

        let all = calc.compute(&parts, true);
        assert_eq!(all.total_target, 40);
        assert_eq!(all.total_found, 35);
        assert_eq!(all.percentage, 88); // 87.5 → 88
    }

    #[test]
    fn test_progress_zero_when_nothing_to_pick() {
        let calc = ProgressCalculator::new();
        assert_eq!(calc.compute(&[], false), ProgressSummary::default());

        let parts = vec![agg("A", 0, 0, true), agg("B", 4, 4, false)];
        let summary = calc.compute(&parts, false);
        assert_eq!(summary.total_target, 0);
        assert_eq!(summary.percentage, 0);
    }
}
