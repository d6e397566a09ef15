// ==========================================
// 库存补货预测系统 - 数据源层
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 5/6/9 节
// 职责: 定义快照数据源接口,一次取数冻结为快照
// 红线: 引擎单次运行只消费一份冻结快照,不得中途重取;
//       数据源策略构造时注入,不得使用全局在线/离线开关
// ==========================================

pub mod memory_source;
pub mod sqlite_source;

use crate::domain::movement::MovementRecord;
use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{instrument, warn};

// 重导出数据源实现
pub use memory_source::InMemorySnapshotSource;
pub use sqlite_source::SqliteSnapshotSource;

// ==========================================
// SnapshotSource Trait
// ==========================================
// 用途: 预测引擎的只读数据来源
// 实现者: SqliteSnapshotSource (本地库) / InMemorySnapshotSource (测试/嵌入)
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// 查询全部产品
    async fn list_products(&self) -> RepositoryResult<Vec<Product>>;

    /// 查询单产品的移动记录 (时间升序)
    async fn list_movements(&self, product_id: &str) -> RepositoryResult<Vec<MovementRecord>>;

    /// 查询单价 (缺失时由调用方回退占位常量)
    async fn unit_price(&self, product_id: &str) -> RepositoryResult<Option<f64>>;
}

// ==========================================
// 冻结快照 (Snapshot)
// ==========================================

/// 一次取数的冻结快照
///
/// 快照新鲜度由数据源一侧负责,引擎在单次运行内视其为不变。
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// 取数时间
    pub taken_at: DateTime<Utc>,

    /// 产品列表 (product_id 升序)
    pub products: Vec<Product>,

    /// 产品 ID → 移动记录
    pub movements: HashMap<String, Vec<MovementRecord>>,
}

impl Snapshot {
    /// 查询产品的移动记录,无记录时返回空切片
    pub fn movements_for(&self, product_id: &str) -> &[MovementRecord] {
        self.movements
            .get(product_id)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }

    /// 按 product_id 查询产品
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.product_id == product_id)
    }
}

// ==========================================
// 快照装配 (显式扇出/扇入)
// ==========================================

/// 一次性拉取冻结快照
///
/// 逐产品移动记录查询以有界并发扇出 (数据源可能有延迟);
/// 单产品查询失败时降级为空记录并记日志,不使整体取数失败。
#[instrument(skip(source))]
pub async fn fetch_snapshot<S>(source: &S, fan_out_limit: usize) -> RepositoryResult<Snapshot>
where
    S: SnapshotSource + ?Sized,
{
    let products = source.list_products().await?;

    let product_ids: Vec<String> = products.iter().map(|p| p.product_id.clone()).collect();
    let movements: HashMap<String, Vec<MovementRecord>> =
        stream::iter(product_ids)
            .map(|product_id| async move {
                match source.list_movements(&product_id).await {
                    Ok(records) => (product_id, records),
                    Err(e) => {
                        warn!(%product_id, error = %e, "movement fetch failed, degraded to empty");
                        (product_id, Vec::new())
                    }
                }
            })
            .buffer_unordered(fan_out_limit.max(1))
            .collect()
            .await;

    Ok(Snapshot {
        taken_at: Utc::now(),
        products,
        movements,
    })
}
