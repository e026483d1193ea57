// ==========================================
// 仓库拣料核对系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + HTTP 库存服务
// 系统定位: 拣料核对与进度引擎（人工录入，服务端记账）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 本地草稿
pub mod repository;

// 引擎层 - 拣料规则
pub mod engine;

// 外部服务 - 库存/历史服务
pub mod inventory;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 会话控制器
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ItemRole, Multiplier, RemoteOperation, SessionPhase};

// 领域实体
pub use domain::{
    FinalizePayload, FinalizeReceipt, LineItem, LineItemRecord, LineItemStore, PickingDraft,
    SessionHeader,
};

// 引擎
pub use engine::{
    AggregationView, AllocationEngine, DraftReconciler, ProgressCalculator, ProgressSummary,
};

// API
pub use api::{ApiError, ApiResult, PickingApi, SessionSnapshot};

// 草稿存储键
pub use repository::DRAFT_KEY;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SmartPick 拣料核对系统";
