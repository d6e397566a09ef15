// ==========================================
// 库存补货预测系统 - 移动记录仓储
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 6. 外部接口
// 红线: Repository 不含业务逻辑,所有查询参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::movement::MovementRecord;
use crate::domain::types::MovementKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// MovementRepository - 移动记录仓储
// ==========================================
/// 移动记录仓储
/// 职责: 管理 movement_record 表的数据访问
/// 说明: kind/occurred_at 不合法的历史行在读出时跳过并记日志,
///       不使整批查询失败 (坏行属于数据质量问题,非致命)
pub struct MovementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MovementRepository {
    /// 创建新的 MovementRepository 实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入移动记录 (事务原子)
    pub fn batch_insert(&self, records: &[MovementRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT INTO movement_record (
                    movement_id, product_id, kind, quantity, occurred_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.movement_id,
                    record.product_id,
                    record.kind.to_string(),
                    record.quantity,
                    record.occurred_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按产品查询移动记录 (时间升序)
    pub fn list_by_product(&self, product_id: &str) -> RepositoryResult<Vec<MovementRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT movement_id, product_id, kind, quantity, occurred_at
            FROM movement_record
            WHERE product_id = ?1
            ORDER BY occurred_at
            "#,
        )?;

        let rows = stmt.query_map(params![product_id], Self::map_row)?;
        Ok(Self::collect_valid(rows))
    }

    /// 查询全部移动记录 (时间升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<MovementRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT movement_id, product_id, kind, quantity, occurred_at
            FROM movement_record
            ORDER BY occurred_at
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_row)?;
        Ok(Self::collect_valid(rows))
    }

    /// 行映射 (kind/occurred_at 不合法时返回 None)
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Option<MovementRecord>> {
        let movement_id: String = row.get(0)?;
        let product_id: String = row.get(1)?;
        let kind_raw: String = row.get(2)?;
        let quantity: u32 = row.get(3)?;
        let occurred_raw: String = row.get(4)?;

        let Some(kind) = MovementKind::parse(&kind_raw) else {
            warn!(%movement_id, kind = %kind_raw, "invalid movement kind, row skipped");
            return Ok(None);
        };
        let Ok(occurred_at) = DateTime::parse_from_rfc3339(&occurred_raw) else {
            warn!(%movement_id, occurred_at = %occurred_raw, "invalid timestamp, row skipped");
            return Ok(None);
        };

        Ok(Some(MovementRecord {
            movement_id,
            product_id,
            kind,
            quantity,
            occurred_at: occurred_at.with_timezone(&Utc),
        }))
    }

    /// 收集有效行,跳过坏行与底层错误行
    fn collect_valid(
        rows: impl Iterator<Item = rusqlite::Result<Option<MovementRecord>>>,
    ) -> Vec<MovementRecord> {
        rows.filter_map(|row| match row {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "movement row read failed, skipped");
                None
            }
        })
        .collect()
    }
}
