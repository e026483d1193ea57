// ==========================================
// 仓库拣料核对系统 - 汇总视图引擎
// ==========================================
// 职责: 由工作集派生两种展示投影
// - 按编码汇总的零件视图
// - 套件视图
// 红线: 每次读取重新计算，不缓存
// ==========================================

use crate::domain::line_item::LineItemStore;
use crate::domain::types::Multiplier;
use crate::engine::allocation::is_done;
use crate::engine::product_code::format_product_code;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 按编码汇总的零件行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAggregate {
    pub code: String,
    pub display_code: String,
    pub description: String,
    pub zone: String,
    pub requested_total: u64,
    pub found_total: u64,
    pub in_scope: bool,
    pub effective_target: u64,
    pub is_done: bool,
}

/// 套件行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitRow {
    pub unique_id: String,
    pub code: String,
    pub display_code: String,
    pub description: String,
    pub zone: String,
    pub quantity_requested: u64,
    pub found: u64,
    pub in_scope: bool,
    pub effective_target: u64,
    pub is_done: bool,
}

/// 可见性判定: 本库区或开启了"显示全部库区"
pub fn is_visible(in_scope: bool, show_all_zones: bool) -> bool {
    in_scope || show_all_zones
}

// ==========================================
// AggregationView - 汇总视图
// ==========================================
pub struct AggregationView {
    // 无状态
}

impl AggregationView {
    pub fn new() -> Self {
        Self {}
    }

    /// 零件视图
    ///
    /// 规则:
    /// - 所有非套件表头行（含子件）按编码分组
    /// - 描述/库区取组内第一行
    /// - in_scope 取组内任意行为真
    /// - 按库区字典序升序（空库区在前），同库区保持首次出现顺序
    pub fn parts_by_code(&self, store: &LineItemStore, multiplier: Multiplier) -> Vec<PartAggregate> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut parts: Vec<PartAggregate> = Vec::new();

        for item in store.items().iter().filter(|i| !i.role.is_kit_header()) {
            let slot = *index.entry(item.product_code.as_str()).or_insert_with(|| {
                parts.push(PartAggregate {
                    code: item.product_code.clone(),
                    display_code: format_product_code(&item.product_code),
                    description: item.description.clone(),
                    zone: item.zone.clone(),
                    requested_total: 0,
                    found_total: 0,
                    in_scope: false,
                    effective_target: 0,
                    is_done: false,
                });
                parts.len() - 1
            });

            let agg = &mut parts[slot];
            agg.requested_total = agg.requested_total.saturating_add(item.quantity_requested);
            agg.found_total = agg.found_total.saturating_add(item.found);
            agg.in_scope |= item.in_scope;
        }

        for agg in parts.iter_mut() {
            agg.effective_target = multiplier.scale(agg.requested_total);
            agg.is_done = is_done(agg.found_total, agg.effective_target);
        }

        parts.sort_by(|a, b| a.zone.cmp(&b.zone));
        parts
    }

    /// 套件视图（保持工作集顺序）
    pub fn kit_rows(&self, store: &LineItemStore, multiplier: Multiplier) -> Vec<KitRow> {
        store
            .items()
            .iter()
            .filter(|i| i.role.is_kit_header())
            .map(|kit| {
                let effective_target = kit.target(multiplier);
                KitRow {
                    unique_id: kit.unique_id.clone(),
                    code: kit.product_code.clone(),
                    display_code: format_product_code(&kit.product_code),
                    description: kit.description.clone(),
                    zone: kit.zone.clone(),
                    quantity_requested: kit.quantity_requested,
                    found: kit.found,
                    in_scope: kit.in_scope,
                    effective_target,
                    is_done: is_done(kit.found, effective_target),
                }
            })
            .collect()
    }

    /// 按可见性过滤后的零件视图
    pub fn visible_parts(
        &self,
        store: &LineItemStore,
        multiplier: Multiplier,
        show_all_zones: bool,
    ) -> Vec<PartAggregate> {
        self.parts_by_code(store, multiplier)
            .into_iter()
            .filter(|p| is_visible(p.in_scope, show_all_zones))
            .collect()
    }

    /// 按可见性过滤后的套件视图
    pub fn visible_kits(
        &self,
        store: &LineItemStore,
        multiplier: Multiplier,
        show_all_zones: bool,
    ) -> Vec<KitRow> {
        self.kit_rows(store, multiplier)
            .into_iter()
            .filter(|k| is_visible(k.in_scope, show_all_zones))
            .collect()
    }
}

impl Default for AggregationView {
    fn default() -> Self {
        Self::new()
    }
}
