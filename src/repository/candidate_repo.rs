// ==========================================
// 制造工站报价匹配系统 - 历史配置仓储
// ==========================================
// 职责: candidate_config / candidate_station 表的数据访问
// 红线: 不含业务逻辑, 只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::candidate::{CandidateConfiguration, CandidateStation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// CandidateConfigRepository - 历史配置仓储
// ==========================================
pub struct CandidateConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CandidateConfigRepository {
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

    /// 读取全量候选历史配置 (含工站明细)
    pub fn list_configurations(&self) -> RepositoryResult<Vec<CandidateConfiguration>> {
        let conn = self.get_conn()?;

        // 配置头
        let mut head_stmt = conn.prepare(
            "SELECT config_id, customer_ref FROM candidate_config ORDER BY config_id",
        )?;
        let head_rows = head_stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut heads: Vec<(String, String)> = Vec::new();
        for row in head_rows {
            heads.push(row?);
        }

        // 工站明细, 一次取全量后按 config_id 分组
        let mut station_stmt = conn.prepare(
            r#"
            SELECT config_id, code, manpower, uph, quantity, unit_price
            FROM candidate_station
            ORDER BY config_id, code
            "#,
        )?;
        let station_rows = station_stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                CandidateStation {
                    code: row.get(1)?,
                    manpower: row.get(2)?,
                    uph: row.get(3)?,
                    quantity: row.get(4)?,
                    unit_price: row.get(5)?,
                },
            ))
        })?;

        let mut grouped: HashMap<String, Vec<CandidateStation>> = HashMap::new();
        for row in station_rows {
            let (config_id, station) = row?;
            grouped.entry(config_id).or_default().push(station);
        }

        let configs = heads
            .into_iter()
            .map(|(config_id, customer_ref)| {
                let stations = grouped.remove(&config_id).unwrap_or_default();
                CandidateConfiguration {
                    config_id,
                    customer_ref,
                    stations,
                }
            })
            .collect();

        Ok(configs)
    }

    /// 插入一条候选配置 (数据准备/测试用)
    pub fn insert_configuration(&self, config: &CandidateConfiguration) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO candidate_config (config_id, customer_ref) VALUES (?1, ?2)",
            params![config.config_id, config.customer_ref],
        )?;

        for station in &config.stations {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO candidate_station (
                    config_id, code, manpower, uph, quantity, unit_price
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    config.config_id,
                    station.code,
                    station.manpower,
                    station.uph,
                    station.quantity,
                    station.unit_price,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}
