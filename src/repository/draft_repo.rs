// ==========================================
// 仓库拣料核对系统 - 拣料草稿仓储
// ==========================================
// 职责: 进行中会话的本地草稿持久化
// 存储: picking_draft 表（固定键，单条记录）
// ==========================================

use crate::domain::session::PickingDraft;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 草稿固定存储键
pub const DRAFT_KEY: &str = "smartpick_session";

const SAVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 已保存的草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDraft {
    pub draft: PickingDraft,
    pub saved_at: NaiveDateTime,
}

// ==========================================
// DraftStore Trait
// ==========================================
// 用途: 草稿读写接口（可替换存储介质）
// 实现者: DraftRepository
pub trait DraftStore: Send + Sync {
    /// 读取草稿；不存在或内容损坏时返回 None
    fn load(&self) -> RepositoryResult<Option<StoredDraft>>;

    /// 覆盖写入草稿
    fn save(&self, draft: &PickingDraft) -> RepositoryResult<()>;

    /// 删除草稿
    fn clear(&self) -> RepositoryResult<()>;
}

// ==========================================
// DraftRepository - SQLite 实现
// ==========================================
pub struct DraftRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DraftRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        let repo = Self { conn };
        // best-effort: 建表失败不阻塞启动，使用时再暴露错误
        if let Err(e) = repo.ensure_table() {
            tracing::warn!("picking_draft ensure failed: {}", e);
        }
        repo
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS picking_draft (
              draft_key TEXT PRIMARY KEY,
              payload_json TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl DraftStore for DraftRepository {
    fn load(&self) -> RepositoryResult<Option<StoredDraft>> {
        let conn = self.get_conn()?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT payload_json, updated_at FROM picking_draft WHERE draft_key = ?1",
                params![DRAFT_KEY],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((payload_json, updated_at)) = row else {
            return Ok(None);
        };

        let draft: PickingDraft = match serde_json::from_str(&payload_json) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("草稿内容损坏,按无草稿处理: {}", e);
                return Ok(None);
            }
        };

        let saved_at = NaiveDateTime::parse_from_str(&updated_at, SAVED_AT_FORMAT).map_err(|e| {
            RepositoryError::FieldValueError {
                field: "updated_at".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Some(StoredDraft { draft, saved_at }))
    }

    fn save(&self, draft: &PickingDraft) -> RepositoryResult<()> {
        let payload_json = serde_json::to_string(draft)?;
        let now = Local::now().naive_local().format(SAVED_AT_FORMAT).to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO picking_draft (draft_key, payload_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(draft_key) DO UPDATE SET
              payload_json = excluded.payload_json,
              updated_at = excluded.updated_at
            "#,
            params![DRAFT_KEY, payload_json, now],
        )?;
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM picking_draft WHERE draft_key = ?1",
            params![DRAFT_KEY],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Multiplier;
    use std::collections::BTreeMap;

    fn repo() -> DraftRepository {
        let conn = Connection::open_in_memory().unwrap();
        DraftRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn sample() -> PickingDraft {
        let mut found = BTreeMap::new();
        found.insert("R1".to_string(), 4);
        found.insert("R2".to_string(), 0);
        PickingDraft {
            global_opd: "OPD-55".to_string(),
            opd_comment: "bloqueado".to_string(),
            multiplier: Some(Multiplier::new(3)),
            found_by_unique_id: found,
        }
    }

    #[test]
    fn test_load_without_draft() {
        assert!(repo().load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_single_slot() {
        let repo = repo();
        repo.save(&sample()).unwrap();

        let mut changed = sample();
        changed.found_by_unique_id.insert("R2".to_string(), 9);
        repo.save(&changed).unwrap();

        let stored = repo.load().unwrap().unwrap();
        assert_eq!(stored.draft, changed);

        let conn = repo.get_conn().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM picking_draft", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clear_removes_draft() {
        let repo = repo();
        repo.save(&sample()).unwrap();
        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_none());
        // 重复清除无副作用
        repo.clear().unwrap();
    }

    #[test]
    fn test_corrupt_payload_is_treated_as_absent() {
        let repo = repo();
        {
            let conn = repo.get_conn().unwrap();
            conn.execute(
                "INSERT INTO picking_draft (draft_key, payload_json, updated_at) VALUES (?1, ?2, ?3)",
                params![DRAFT_KEY, "{not json", "2026-01-01 00:00:00"],
            )
            .unwrap();
        }
        assert!(repo.load().unwrap().is_none());
    }
}
