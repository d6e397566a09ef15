// ==========================================
// 库存补货预测系统 - 产品主数据仓储
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 6. 外部接口
// 红线: Repository 不含业务逻辑,所有查询参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 产品主数据仓储
// ==========================================
/// 产品主数据仓储
/// 职责: 管理 product 表的数据访问
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例
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

    /// 批量插入产品 (INSERT OR REPLACE, 事务原子)
    pub fn batch_insert(&self, products: &[Product]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for product in products {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO product (
                    product_id, code, name, quantity, min_quantity,
                    supplier, category, unit_price
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    product.product_id,
                    product.code,
                    product.name,
                    product.quantity,
                    product.min_quantity,
                    product.supplier,
                    product.category,
                    product.unit_price,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按 product_id 查询产品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, code, name, quantity, min_quantity,
                   supplier, category, unit_price
            FROM product
            WHERE product_id = ?1
            "#,
        )?;

        let result = stmt
            .query_row(params![product_id], Self::map_row)
            .optional()?;
        Ok(result)
    }

    /// 查询全部产品 (product_id 升序, 保证快照确定性)
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, code, name, quantity, min_quantity,
                   supplier, category, unit_price
            FROM product
            ORDER BY product_id
            "#,
        )?;

        let rows = stmt.query_map([], Self::map_row)?;
        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// 行映射
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            product_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            min_quantity: row.get(4)?,
            supplier: row.get(5)?,
            category: row.get(6)?,
            unit_price: row.get(7)?,
        })
    }
}
