// ==========================================
// 库存补货预测系统 - ForecastApi 实现
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 5/6/7 节
// 职责: 组合数据源快照与各引擎,实现三个公开查询
// 红线: 单次调用只取一份冻结快照; 单产品失败不中断整批;
//       降级路径记日志,不向调用方抛业务异常
// ==========================================

use crate::api::error::ApiResult;
use crate::api::forecast_api::ForecastApi;
use crate::config::ForecastParameters;
use crate::datasource::{fetch_snapshot, Snapshot, SnapshotSource};
use crate::domain::prediction::{PredictionResult, PriorityEntry, ShoppingList};
use crate::domain::product::Product;
use crate::engine::{PriorityRanker, ProcurementListBuilder, StockoutPredictor};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};

// ==========================================
// ForecastApiImpl - 预测接口实现
// ==========================================
pub struct ForecastApiImpl<S>
where
    S: SnapshotSource,
{
    source: Arc<S>,
    params: ForecastParameters,
    predictor: StockoutPredictor,
    ranker: PriorityRanker,
    builder: ProcurementListBuilder,
}

impl<S> ForecastApiImpl<S>
where
    S: SnapshotSource,
{
    /// 创建新的 ForecastApiImpl 实例
    ///
    /// # 参数
    /// - source: 快照数据源 (构造时注入,见依赖注入红线)
    /// - params: 预测参数
    pub fn new(source: Arc<S>, params: ForecastParameters) -> Self {
        Self {
            source,
            params,
            predictor: StockoutPredictor::new(),
            ranker: PriorityRanker::new(),
            builder: ProcurementListBuilder::new(),
        }
    }

    // ==========================================
    // 指定日期的变体 (测试与回放使用)
    // ==========================================

    /// 单产品预测 (指定"今天")
    ///
    /// 未知产品 ID 降级为零库存占位产品,走零消费分支。
    #[instrument(skip(self))]
    pub async fn forecast_product_as_of(
        &self,
        product_id: &str,
        today: NaiveDate,
    ) -> ApiResult<PredictionResult> {
        let products = self.source.list_products().await?;
        let product = match products.into_iter().find(|p| p.product_id == product_id) {
            Some(p) => p,
            None => {
                warn!(%product_id, "unknown product, degraded prediction");
                Product::new(product_id.to_string(), String::new(), String::new(), 0)
            }
        };

        // 移动记录查询失败同样降级为空历史
        let movements = match self.source.list_movements(product_id).await {
            Ok(records) => records,
            Err(e) => {
                warn!(%product_id, error = %e, "movement fetch failed, degraded to empty");
                Vec::new()
            }
        };

        Ok(self
            .predictor
            .predict(&product, &movements, today, &self.params))
    }

    /// 优先级排序 (指定"今天")
    #[instrument(skip(self))]
    pub async fn rank_priority_products_as_of(
        &self,
        today: NaiveDate,
    ) -> ApiResult<Vec<PriorityEntry>> {
        let snapshot = fetch_snapshot(self.source.as_ref(), self.params.fan_out_limit).await?;
        let predictions = self.predict_all(&snapshot, today);
        Ok(self.ranker.rank(&predictions, today, &self.params))
    }

    /// 采购清单 (指定"今天")
    #[instrument(skip(self))]
    pub async fn build_shopping_list_as_of(&self, today: NaiveDate) -> ApiResult<ShoppingList> {
        let snapshot = fetch_snapshot(self.source.as_ref(), self.params.fan_out_limit).await?;
        let predictions = self.predict_all(&snapshot, today);
        let ranked = self.ranker.rank(&predictions, today, &self.params);

        // 单价查询表 (产品单价缺失时由清单引擎回退占位常量)
        let unit_prices: HashMap<String, f64> = snapshot
            .products
            .iter()
            .filter_map(|p| p.unit_price.map(|price| (p.product_id.clone(), price)))
            .collect();

        Ok(self
            .builder
            .build(&ranked, &unit_prices, today, &self.params))
    }

    // ==========================================
    // 内部: 逐产品预测 (失败隔离)
    // ==========================================

    /// 对快照内全部产品逐个预测
    ///
    /// 预测引擎本身不抛错; 此处仍逐产品隔离,缺移动记录的产品
    /// 得到降级结果而非被跳过。
    fn predict_all(
        &self,
        snapshot: &Snapshot,
        today: NaiveDate,
    ) -> Vec<(Product, PredictionResult)> {
        snapshot
            .products
            .iter()
            .map(|product| {
                let movements = snapshot.movements_for(&product.product_id);
                let prediction =
                    self.predictor
                        .predict(product, movements, today, &self.params);
                (product.clone(), prediction)
            })
            .collect()
    }
}

// ==========================================
// ForecastApi trait 实现 (以当前日期计算)
// ==========================================
#[async_trait]
impl<S> ForecastApi for ForecastApiImpl<S>
where
    S: SnapshotSource,
{
    async fn forecast_product(&self, product_id: &str) -> ApiResult<PredictionResult> {
        self.forecast_product_as_of(product_id, Utc::now().date_naive())
            .await
    }

    async fn rank_priority_products(&self) -> ApiResult<Vec<PriorityEntry>> {
        self.rank_priority_products_as_of(Utc::now().date_naive())
            .await
    }

    async fn build_shopping_list(&self) -> ApiResult<ShoppingList> {
        self.build_shopping_list_as_of(Utc::now().date_naive())
            .await
    }
}
