// ==========================================
// 仓库拣料核对系统 - 领域类型定义
// ==========================================
// 职责: 行角色、倍数、会话阶段等值类型
// 红线: 数量一律为非负整数，不使用浮点
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 行角色 (Item Role)
// ==========================================
// 由 isKit / parentId 组合推导:
// - isKit=true              → KitHeader
// - isKit=false + parentId  → KitChild
// - 其余                    → Part
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemRole {
    Part,                            // 普通零件
    KitHeader,                       // 套件表头
    KitChild { parent_id: String },  // 套件子件
}

impl ItemRole {
    pub fn is_kit_header(&self) -> bool {
        matches!(self, ItemRole::KitHeader)
    }

    pub fn is_plain_part(&self) -> bool {
        matches!(self, ItemRole::Part)
    }

    /// 子件所属套件的 uniqueId
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            ItemRole::KitChild { parent_id } => Some(parent_id.as_str()),
            _ => None,
        }
    }

    /// 是否属于指定套件
    pub fn is_child_of(&self, kit_id: &str) -> bool {
        self.parent_id() == Some(kit_id)
    }
}

impl fmt::Display for ItemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRole::Part => write!(f, "PART"),
            ItemRole::KitHeader => write!(f, "KIT_HEADER"),
            ItemRole::KitChild { parent_id } => write!(f, "KIT_CHILD({})", parent_id),
        }
    }
}

// ==========================================
// 倍数 (Multiplier)
// ==========================================
// 正整数，默认 1；只放大目标量，不修改基础需求量
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ONE: Multiplier = Multiplier(1);

    /// 构造倍数，0 视为 1
    pub fn new(value: u32) -> Self {
        Multiplier(value.max(1))
    }

    /// 宽松解析操作员输入
    ///
    /// 非数字、0、负数一律回退为 1
    pub fn parse_lenient(raw: &str) -> Self {
        match crate::engine::allocation::parse_quantity_entry(raw) {
            v if v >= 1 => Multiplier(u32::try_from(v).unwrap_or(u32::MAX)),
            _ => Multiplier::ONE,
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 基础数量 × 倍数（饱和乘法）
    pub fn scale(self, base: u64) -> u64 {
        base.saturating_mul(u64::from(self.0))
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

impl TryFrom<i64> for Multiplier {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 1 {
            return Err(format!("倍数必须为正整数: {}", value));
        }
        u32::try_from(value)
            .map(Multiplier)
            .map_err(|_| format!("倍数超出范围: {}", value))
    }
}

impl From<Multiplier> for u32 {
    fn from(m: Multiplier) -> u32 {
        m.0
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

// ==========================================
// 会话阶段 (Session Phase)
// ==========================================
// Empty → Loaded → Finalizing → Empty
// Empty/Loaded → Replacing → Loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    Empty,      // 无清单
    Loaded,     // 已加载,可编辑
    Replacing,  // 上传替换进行中
    Finalizing, // 提交进行中
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Empty => write!(f, "EMPTY"),
            SessionPhase::Loaded => write!(f, "LOADED"),
            SessionPhase::Replacing => write!(f, "REPLACING"),
            SessionPhase::Finalizing => write!(f, "FINALIZING"),
        }
    }
}

// ==========================================
// 远程操作类型 (Remote Operation)
// ==========================================
// 用于防重入标记与错误提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteOperation {
    Load,
    Upload,
    Finalize,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::Load => write!(f, "LOAD"),
            RemoteOperation::Upload => write!(f, "UPLOAD"),
            RemoteOperation::Finalize => write!(f, "FINALIZE"),
        }
    }
}
