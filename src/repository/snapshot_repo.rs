// ==========================================
// 制造工站报价匹配系统 - 审计与报价快照仓储
// ==========================================
// 职责: resolution_audit / quotation_snapshot 表的追加写入
// 红线: 快照不可变, 只插入, 不更新不删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::quote::QuotationSnapshot;
use crate::domain::station::{ResolutionSummary, ResolvedStation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 解析审计记录的持久化载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionAuditPayload {
    pub results: Vec<ResolvedStation>,
    pub summary: ResolutionSummary,
}

// ==========================================
// SnapshotRepository - 审计/快照仓储
// ==========================================
pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 持久化一次解析结果作为审计记录
    ///
    /// # 返回
    /// - 审计记录 ID
    pub fn insert_resolution_audit(
        &self,
        customer_scope: Option<&str>,
        results: &[ResolvedStation],
        summary: &ResolutionSummary,
    ) -> RepositoryResult<String> {
        let audit_id = Uuid::new_v4().to_string();
        let payload = ResolutionAuditPayload {
            results: results.to_vec(),
            summary: summary.clone(),
        };
        let payload_json = serde_json::to_string(&payload)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO resolution_audit (audit_id, customer_scope, created_at, payload_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                audit_id,
                customer_scope,
                Utc::now().to_rfc3339(),
                payload_json
            ],
        )?;

        Ok(audit_id)
    }

    /// 持久化报价快照 (不可变)
    pub fn insert_quotation_snapshot(
        &self,
        snapshot: &QuotationSnapshot,
    ) -> RepositoryResult<()> {
        let payload_json = serde_json::to_string(snapshot)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO quotation_snapshot (
                snapshot_id, customer_scope, created_at, disposition, payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                snapshot.snapshot_id,
                snapshot.customer_scope,
                snapshot.created_at.to_rfc3339(),
                snapshot.disposition.to_string(),
                payload_json
            ],
        )?;

        Ok(())
    }

    /// 读取报价快照 (报表侧消费)
    pub fn get_quotation_snapshot(
        &self,
        snapshot_id: &str,
    ) -> RepositoryResult<QuotationSnapshot> {
        let conn = self.get_conn()?;
        let payload_json: String = conn
            .query_row(
                "SELECT payload_json FROM quotation_snapshot WHERE snapshot_id = ?1",
                params![snapshot_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "QuotationSnapshot".to_string(),
                    id: snapshot_id.to_string(),
                },
                other => RepositoryError::from(other),
            })?;

        let snapshot = serde_json::from_str(&payload_json)?;
        Ok(snapshot)
    }
}
