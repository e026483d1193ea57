// ==========================================
// 仓库拣料核对系统 - 会话领域模型
// ==========================================
// 职责: 会话表头、本地草稿、提交载荷与回执
// ==========================================

use crate::domain::types::Multiplier;
use crate::engine::allocation::parse_quantity_entry;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ==========================================
// SessionHeader - 会话表头（不属于拣料行）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHeader {
    pub global_opd: String,     // 可编辑的订单标签
    pub opd_comment: String,    // 缺料备注
    pub multiplier: Multiplier, // 全局倍数
}

// ==========================================
// PickingDraft - 本地草稿
// ==========================================
// 固定键存储，同一时间只存在一份
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickingDraft {
    #[serde(default)]
    pub global_opd: String,
    #[serde(default)]
    pub opd_comment: String,
    #[serde(default, deserialize_with = "lenient_multiplier")]
    pub multiplier: Option<Multiplier>,
    #[serde(default, alias = "foundItems")]
    pub found_by_unique_id: BTreeMap<String, u64>,
}

impl PickingDraft {
    /// 由表头与 found 映射组装草稿
    pub fn capture(header: &SessionHeader, found_by_unique_id: BTreeMap<String, u64>) -> Self {
        Self {
            global_opd: header.global_opd.clone(),
            opd_comment: header.opd_comment.clone(),
            multiplier: Some(header.multiplier),
            found_by_unique_id,
        }
    }
}

/// 草稿中的倍数可能是数字或文本；无法识别或小于 1 时视为未设置
fn lenient_multiplier<'de, D>(deserializer: D) -> Result<Option<Multiplier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_i64().and_then(|v| Multiplier::try_from(v).ok()),
        Some(Value::String(s)) => {
            Some(parse_quantity_entry(&s)).and_then(|v| Multiplier::try_from(v).ok())
        }
        _ => None,
    };
    Ok(parsed)
}

// ==========================================
// FinalizePayload - 提交载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizePayload {
    pub global_opd: String,
    pub opd_comment: String,
    pub multiplier: Multiplier,
    /// uniqueId → found
    // 历史服务端按 items 读取该映射，线上字段名保持 items
    #[serde(rename = "items", alias = "itemsByUniqueId")]
    pub items_by_unique_id: BTreeMap<String, u64>,
}

// ==========================================
// FinalizeReceipt - 提交回执
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeReceipt {
    pub message: String,
}
