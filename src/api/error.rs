// ==========================================
// 仓库拣料核对系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为操作员可读的错误消息
// 约束: 录入格式错误与越界不属于错误（本地截断/归零）
// ==========================================

use crate::domain::types::RemoteOperation;
use crate::engine::allocation::AllocationError;
use crate::i18n::{t, t_with_args};
use crate::inventory::error::InventoryError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {entity}(id={id})")]
    NotFound { entity: String, id: String },

    #[error("当前没有可提交的拣料清单")]
    EmptySession,

    #[error("结束会话需要操作员确认")]
    ConfirmationRequired,

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("操作进行中: {operation}")]
    OperationInProgress { operation: RemoteOperation },

    // ==========================================
    // 外部服务错误
    // ==========================================
    #[error("库存服务调用失败 ({operation}): {message}")]
    RemoteCallFailed {
        operation: RemoteOperation,
        message: String,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 包装库存服务错误，附带操作类型
    pub fn remote(operation: RemoteOperation, err: InventoryError) -> Self {
        ApiError::RemoteCallFailed {
            operation,
            message: err.to_string(),
        }
    }

    /// 稳定错误码（供前端/日志检索）
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::EmptySession => "EMPTY_SESSION",
            ApiError::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            ApiError::OperationInProgress { .. } => "OPERATION_IN_PROGRESS",
            ApiError::RemoteCallFailed { .. } => "REMOTE_CALL_FAILED",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::SerializationError(_) => "SERIALIZATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// 按当前语言生成操作员提示
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidInput(msg) => t_with_args("picking.invalid_input", &[("message", msg.as_str())]),
            ApiError::NotFound { entity, id } => {
                t_with_args("picking.not_found", &[("entity", entity.as_str()), ("id", id.as_str())])
            }
            ApiError::EmptySession => t("picking.empty_session"),
            ApiError::ConfirmationRequired => t("picking.confirmation_required"),
            ApiError::OperationInProgress { operation } => {
                let op = operation_label(*operation);
                t_with_args("picking.operation_in_progress", &[("operation", op.as_str())])
            }
            ApiError::RemoteCallFailed { operation, message } => match operation {
                RemoteOperation::Load => {
                    t_with_args("picking.load_failed", &[("message", message.as_str())])
                }
                RemoteOperation::Upload => t("picking.upload_failed"),
                RemoteOperation::Finalize => {
                    t_with_args("picking.finalize_failed", &[("message", message.as_str())])
                }
            },
            ApiError::DatabaseError(msg)
            | ApiError::DatabaseConnectionError(msg)
            | ApiError::SerializationError(msg) => {
                t_with_args("common.database_error", &[("message", msg.as_str())])
            }
            ApiError::InternalError(msg) => {
                t_with_args("common.internal_error", &[("message", msg.as_str())])
            }
            ApiError::Other(err) => {
                t_with_args("common.internal_error", &[("message", err.to_string().as_str())])
            }
        }
    }
}

/// 远程操作的本地化名称
pub fn operation_label(operation: RemoteOperation) -> String {
    let key = match operation {
        RemoteOperation::Load => "operation.load",
        RemoteOperation::Upload => "operation.upload",
        RemoteOperation::Finalize => "operation.finalize",
    };
    t(key)
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ApiError::NotFound { entity, id },
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => ApiError::SerializationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 AllocationError 转换
// ==========================================
impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::UnknownKit(id) => ApiError::NotFound {
                entity: "Kit".to_string(),
                id,
            },
            AllocationError::UnknownProductCode(code) => ApiError::NotFound {
                entity: "ProductCode".to_string(),
                id: code,
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
