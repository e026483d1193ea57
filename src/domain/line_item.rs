// ==========================================
// 仓库拣料核对系统 - 拣料行领域模型
// ==========================================
// 职责: 拣料行实体、库存服务线格式、行集合（工作集）
// 红线: found 只能经由分配引擎修改
// ==========================================

use crate::domain::types::{ItemRole, Multiplier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// LineItemRecord - 库存服务返回的原始行
// ==========================================
// 线格式兼容两套字段名:
// - isKit / parentId
// - kitParent / parentCode（旧版服务）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    pub unique_id: String,
    #[serde(default)]
    pub opd: Option<String>,
    pub product_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub quantity_requested: i64,
    #[serde(default, alias = "kitParent")]
    pub is_kit: bool,
    #[serde(default, alias = "parentCode")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub in_scope: bool,
}

// ==========================================
// LineItem - 拣料行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub unique_id: String,       // 行唯一标识(订单内唯一)
    pub opd: String,             // 所属订单号
    pub product_code: String,    // 物料/套件编码(不唯一)
    pub description: String,     // 描述
    pub zone: String,            // 库区
    pub quantity_requested: u64, // 基础需求量(未乘倍数)
    pub role: ItemRole,          // 行角色
    pub in_scope: bool,          // 是否属于操作员负责库区
    pub found: u64,              // 已找到数量
}

impl LineItem {
    /// 当前倍数下的目标量
    pub fn target(&self, multiplier: Multiplier) -> u64 {
        multiplier.scale(self.quantity_requested)
    }

    /// 是否已达到目标量（目标为 0 时判定为已达成当且仅当 found 也为 0）
    pub fn is_at_target(&self, multiplier: Multiplier) -> bool {
        self.found == self.target(multiplier)
    }
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        let parent_id = record
            .parent_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let role = if record.is_kit {
            if let Some(parent) = &parent_id {
                tracing::warn!(
                    unique_id = %record.unique_id,
                    parent_id = %parent,
                    "套件表头携带 parentId,按表头处理并忽略该引用"
                );
            }
            ItemRole::KitHeader
        } else if let Some(parent_id) = parent_id {
            ItemRole::KitChild { parent_id }
        } else {
            ItemRole::Part
        };

        Self {
            unique_id: record.unique_id,
            opd: record.opd.unwrap_or_default(),
            product_code: record.product_code.trim().to_string(),
            description: record.description.unwrap_or_default(),
            zone: record.zone.unwrap_or_default(),
            quantity_requested: u64::try_from(record.quantity_requested).unwrap_or(0),
            role,
            in_scope: record.in_scope,
            found: 0,
        }
    }
}

// ==========================================
// LineItemStore - 当前订单的拣料行工作集
// ==========================================
// 整体替换: 初次加载 / 上传成功 / 提交成功（清空）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemStore {
    items: Vec<LineItem>,
}

impl LineItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从库存服务返回的原始行构建工作集
    ///
    /// 规范化规则:
    /// - uniqueId 重复的行只保留第一条
    /// - 子件引用的套件不存在（孤儿子件）时降级为普通零件
    /// - 所有 found 归零
    pub fn from_records(records: Vec<LineItemRecord>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut items: Vec<LineItem> = Vec::with_capacity(records.len());

        for record in records {
            if !seen.insert(record.unique_id.clone()) {
                tracing::warn!(unique_id = %record.unique_id, "重复的 uniqueId,已忽略后续行");
                continue;
            }
            items.push(LineItem::from(record));
        }

        Self::from_items(items)
    }

    /// 直接由拣料行构建（同样执行孤儿子件降级）
    pub fn from_items(mut items: Vec<LineItem>) -> Self {
        let kit_ids: HashSet<String> = items
            .iter()
            .filter(|i| i.role.is_kit_header())
            .map(|i| i.unique_id.clone())
            .collect();

        for item in items.iter_mut() {
            let orphan = matches!(
                item.role.parent_id(),
                Some(parent) if !kit_ids.contains(parent)
            );
            if orphan {
                tracing::warn!(
                    unique_id = %item.unique_id,
                    parent = ?item.role.parent_id(),
                    "子件引用的套件不存在,按普通零件处理"
                );
                item.role = ItemRole::Part;
            }
        }

        Self { items }
    }

    /// 已规范化的行（分配引擎输出）直接装箱
    pub(crate) fn from_normalized(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, unique_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.unique_id == unique_id)
    }

    /// 第一行的订单号（用于默认 OPD）
    pub fn first_opd(&self) -> Option<&str> {
        self.items.first().map(|i| i.opd.as_str())
    }

    /// uniqueId → found 映射（草稿与提交载荷使用）
    pub fn found_by_unique_id(&self) -> BTreeMap<String, u64> {
        self.items
            .iter()
            .map(|i| (i.unique_id.clone(), i.found))
            .collect()
    }
}
