// ==========================================
// 仓库拣料核对系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::i18n::{DEFAULT_LOCALE, SUPPORTED_LOCALES};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 库存服务默认地址
pub const DEFAULT_INVENTORY_BASE_URL: &str = "http://localhost:8080/api/picking";

/// 库存服务默认超时（秒）
pub const DEFAULT_INVENTORY_TIMEOUT_SECS: u64 = 20;

// ==========================================
// PickingSettings - 启动时读取的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickingSettings {
    pub inventory_base_url: String,
    pub inventory_timeout: Duration,
    pub locale: String,
    pub show_all_zones: bool,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self {
            inventory_base_url: DEFAULT_INVENTORY_BASE_URL.to_string(),
            inventory_timeout: Duration::from_secs(DEFAULT_INVENTORY_TIMEOUT_SECS),
            locale: DEFAULT_LOCALE.to_string(),
            show_all_zones: false,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            conn_guard.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS config_kv (
                    scope_id TEXT NOT NULL,
                    key TEXT NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                    PRIMARY KEY (scope_id, key)
                );
                "#,
            )?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置值（UPSERT）
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 启动时记录生效配置，便于现场排查
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 库存服务配置 =====

    /// 库存服务根地址
    pub fn get_inventory_base_url(&self) -> Result<String, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::INVENTORY_BASE_URL, DEFAULT_INVENTORY_BASE_URL)?;
        let value = value.trim();
        if value.is_empty() {
            return Ok(DEFAULT_INVENTORY_BASE_URL.to_string());
        }
        Ok(value.to_string())
    }

    /// 库存服务请求超时；非法或为 0 时使用默认值
    pub fn get_inventory_timeout(&self) -> Result<Duration, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::INVENTORY_TIMEOUT_SECS,
            &DEFAULT_INVENTORY_TIMEOUT_SECS.to_string(),
        )?;
        let secs = value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_INVENTORY_TIMEOUT_SECS);
        Ok(Duration::from_secs(secs))
    }

    // ===== 界面配置 =====

    /// 界面语言；不在支持列表内时回落到默认语言
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::UI_LOCALE, DEFAULT_LOCALE)?;
        let value = value.trim();
        if SUPPORTED_LOCALES.contains(&value) {
            Ok(value.to_string())
        } else {
            tracing::warn!(locale = value, "配置的语言不受支持,使用默认语言");
            Ok(DEFAULT_LOCALE.to_string())
        }
    }

    // ===== 拣料配置 =====

    /// 区域开关初始值（是否显示全部区域）
    pub fn get_show_all_zones(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::SHOW_ALL_ZONES, "false")?;
        Ok(matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ))
    }

    /// 一次性读取启动所需配置
    pub fn load_settings(&self) -> Result<PickingSettings, Box<dyn Error>> {
        Ok(PickingSettings {
            inventory_base_url: self.get_inventory_base_url()?,
            inventory_timeout: self.get_inventory_timeout()?,
            locale: self.get_locale()?,
            show_all_zones: self.get_show_all_zones()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 库存服务
    pub const INVENTORY_BASE_URL: &str = "inventory.base_url";
    pub const INVENTORY_TIMEOUT_SECS: &str = "inventory.timeout_secs";

    // 界面
    pub const UI_LOCALE: &str = "ui.locale";

    // 拣料
    pub const SHOW_ALL_ZONES: &str = "picking.show_all_zones";
}
