// ==========================================
// 制造工站报价匹配系统 - 工站主数据仓储
// ==========================================
// 职责: station_master / station_alias 表的数据访问
// 红线: 不含业务逻辑, 只负责数据访问
// 说明: 参考数据由独立数据管理流程维护, 本核心只读;
//       写接口仅用于数据准备与测试
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::station::{StationAlias, StationMaster};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// StationMasterRepository - 工站主数据仓储
// ==========================================
pub struct StationMasterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationMasterRepository {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 读取全量工站主数据
    pub fn list_stations(&self) -> RepositoryResult<Vec<StationMaster>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT code, name, description, default_manpower, default_uph, unit_price
            FROM station_master
            ORDER BY code
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StationMaster {
                code: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                default_manpower: row.get(3)?,
                default_uph: row.get(4)?,
                unit_price: row.get(5)?,
            })
        })?;

        let mut stations = Vec::new();
        for row in rows {
            stations.push(row?);
        }
        Ok(stations)
    }

    /// 读取全量别名
    pub fn list_aliases(&self) -> RepositoryResult<Vec<StationAlias>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT alias, canonical_code, customer_scope, confidence
            FROM station_alias
            ORDER BY alias
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StationAlias {
                alias: row.get(0)?,
                canonical_code: row.get(1)?,
                customer_scope: row.get(2)?,
                confidence: row.get(3)?,
            })
        })?;

        let mut aliases = Vec::new();
        for row in rows {
            aliases.push(row?);
        }
        Ok(aliases)
    }

    /// 批量插入工站主数据 (INSERT OR REPLACE, 数据准备/测试用)
    pub fn batch_insert_stations(&self, stations: &[StationMaster]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for station in stations {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO station_master (
                    code, name, description, default_manpower, default_uph, unit_price
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    station.code,
                    station.name,
                    station.description,
                    station.default_manpower,
                    station.default_uph,
                    station.unit_price,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 批量插入别名 (INSERT OR REPLACE, 数据准备/测试用)
    pub fn batch_insert_aliases(&self, aliases: &[StationAlias]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for alias in aliases {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO station_alias (
                    alias, canonical_code, customer_scope, confidence
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    alias.alias,
                    alias.canonical_code,
                    alias.customer_scope,
                    alias.confidence,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}
