// ==========================================
// 库存补货预测系统 - SQLite 数据源
// ==========================================
// 职责: 基于本地 SQLite 仓储实现 SnapshotSource
// 说明: 仓储查询为同步 rusqlite 调用,此处仅做接口适配
// ==========================================

use crate::datasource::SnapshotSource;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::movement::MovementRecord;
use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use crate::repository::{MovementRepository, ProductRepository};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// SQLite 数据源
///
/// 两个仓储共享同一连接,避免多连接间的 PRAGMA 不一致。
pub struct SqliteSnapshotSource {
    product_repo: ProductRepository,
    movement_repo: MovementRepository,
}

impl SqliteSnapshotSource {
    /// 打开数据库并初始化表结构
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            product_repo: ProductRepository::from_connection(Arc::clone(&conn)),
            movement_repo: MovementRepository::from_connection(conn),
        })
    }

    /// 产品仓储 (写入测试数据用)
    pub fn product_repo(&self) -> &ProductRepository {
        &self.product_repo
    }

    /// 移动记录仓储 (写入测试数据用)
    pub fn movement_repo(&self) -> &MovementRepository {
        &self.movement_repo
    }
}

#[async_trait]
impl SnapshotSource for SqliteSnapshotSource {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        self.product_repo.list_all()
    }

    async fn list_movements(&self, product_id: &str) -> RepositoryResult<Vec<MovementRecord>> {
        self.movement_repo.list_by_product(product_id)
    }

    async fn unit_price(&self, product_id: &str) -> RepositoryResult<Option<f64>> {
        Ok(self
            .product_repo
            .find_by_id(product_id)?
            .and_then(|p| p.unit_price))
    }
}
