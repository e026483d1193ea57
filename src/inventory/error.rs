// ==========================================
// 仓库拣料核对系统 - 库存服务错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 库存服务调用错误
#[derive(Error, Debug)]
pub enum InventoryError {
    // ===== 传输错误 =====
    #[error("库存服务请求失败: {0}")]
    Transport(String),

    #[error("库存服务返回错误状态 ({status}): {body}")]
    HttpStatus { status: u16, body: String },

    // ===== 数据错误 =====
    #[error("库存服务响应解析失败: {0}")]
    Decode(String),

    #[error("结构文件被拒绝: {0}")]
    Rejected(String),

    // ===== 配置错误 =====
    #[error("库存服务地址无效: {0}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InventoryError::Decode(err.to_string())
        } else {
            InventoryError::Transport(err.to_string())
        }
    }
}

/// Result 类型别名
pub type InventoryResult<T> = Result<T, InventoryError>;
