// ==========================================
// 库存补货预测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout (毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
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

/// 初始化快照存储的表结构
///
/// product / movement_record 两张表,由外部库存事务写入,
/// 预测引擎只读。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS product (
            product_id    TEXT PRIMARY KEY,
            code          TEXT NOT NULL,
            name          TEXT NOT NULL,
            quantity      INTEGER NOT NULL DEFAULT 0,
            min_quantity  INTEGER,
            supplier      TEXT,
            category      TEXT,
            unit_price    REAL
        );

        CREATE TABLE IF NOT EXISTS movement_record (
            movement_id   TEXT PRIMARY KEY,
            product_id    TEXT NOT NULL REFERENCES product(product_id),
            kind          TEXT NOT NULL,
            quantity      INTEGER NOT NULL CHECK (quantity >= 0),
            occurred_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_movement_product_time
            ON movement_record (product_id, occurred_at);
        "#,
    )
}

/// 默认数据库路径 (应用数据目录下)
///
/// 数据目录不可用时回退到当前目录。
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inventory-forecast")
        .join("inventory.db")
}
