// ==========================================
// 库存补货预测系统 - 内存数据源
// ==========================================
// 职责: 持有内存中的产品/移动记录,供测试与嵌入式调用方使用
// ==========================================

use crate::datasource::SnapshotSource;
use crate::domain::movement::MovementRecord;
use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 内存数据源
///
/// 构造后不可变,天然满足"冻结快照"约束。
pub struct InMemorySnapshotSource {
    products: Vec<Product>,
    movements: Vec<MovementRecord>,
}

impl InMemorySnapshotSource {
    /// 创建内存数据源
    pub fn new(products: Vec<Product>, movements: Vec<MovementRecord>) -> Self {
        Self {
            products,
            movements,
        }
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        let mut products = self.products.clone();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        Ok(products)
    }

    async fn list_movements(&self, product_id: &str) -> RepositoryResult<Vec<MovementRecord>> {
        let mut records: Vec<MovementRecord> = self
            .movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));
        Ok(records)
    }

    async fn unit_price(&self, product_id: &str) -> RepositoryResult<Option<f64>> {
        Ok(self
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .and_then(|p| p.unit_price))
    }
}
