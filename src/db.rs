// ==========================================
// 制造工站报价匹配系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout (毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要每个连接单独开启
/// - busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化参考数据与快照 schema (幂等)
///
/// 参考数据表 (station_master / station_alias / candidate_config /
/// candidate_station) 由独立的数据管理流程写入, 本核心只读;
/// 审计与快照表由本核心追加写入, 写后不改。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS station_master (
            code            TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            default_manpower REAL,
            default_uph     REAL,
            unit_price      REAL
        );

        CREATE TABLE IF NOT EXISTS station_alias (
            alias           TEXT NOT NULL,
            canonical_code  TEXT NOT NULL REFERENCES station_master(code),
            customer_scope  TEXT,
            confidence      REAL NOT NULL DEFAULT 1.0,
            PRIMARY KEY (alias, canonical_code, customer_scope)
        );

        CREATE TABLE IF NOT EXISTS candidate_config (
            config_id       TEXT PRIMARY KEY,
            customer_ref    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS candidate_station (
            config_id       TEXT NOT NULL REFERENCES candidate_config(config_id),
            code            TEXT NOT NULL,
            manpower        REAL NOT NULL DEFAULT 0,
            uph             REAL,
            quantity        INTEGER NOT NULL DEFAULT 1,
            unit_price      REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (config_id, code)
        );

        CREATE TABLE IF NOT EXISTS resolution_audit (
            audit_id        TEXT PRIMARY KEY,
            customer_scope  TEXT,
            created_at      TEXT NOT NULL,
            payload_json    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS quotation_snapshot (
            snapshot_id     TEXT PRIMARY KEY,
            customer_scope  TEXT,
            created_at      TEXT NOT NULL,
            disposition     TEXT NOT NULL,
            payload_json    TEXT NOT NULL
        );
        "#,
    )
}
