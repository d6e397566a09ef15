// ==========================================
// 库存补货预测系统 - ForecastApi Trait 定义
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 6. 外部接口
// 职责: 定义预测引擎的 3 个核心查询接口
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::prediction::{PredictionResult, PriorityEntry, ShoppingList};
use async_trait::async_trait;

/// ForecastApi trait
///
/// 提供 3 个核心预测查询功能:
/// - F1: 单产品缺货预测
/// - F2: 跨产品补货优先级排序
/// - F3: 供应商分组采购清单
#[async_trait]
pub trait ForecastApi: Send + Sync {
    /// F1: 单产品缺货预测 - "这个产品还能撑几天"
    ///
    /// 未知产品 ID 或无移动历史时降级为中性结果 (零消费分支),
    /// 不返回错误; 只有数据源整体不可用才返回 Err。
    ///
    /// # 参数
    /// - `product_id`: 产品 ID
    ///
    /// # 返回
    /// - 成功: PredictionResult
    /// - 失败: 数据源故障
    async fn forecast_product(&self, product_id: &str) -> ApiResult<PredictionResult>;

    /// F2: 补货优先级排序 - "先买什么"
    ///
    /// 对快照内全部产品逐个预测后横向排序;
    /// 单产品失败只降级该产品,不中断整批。
    ///
    /// # 返回
    /// - 成功: 优先级条目列表 (紧急在前)
    /// - 失败: 数据源故障
    async fn rank_priority_products(&self) -> ApiResult<Vec<PriorityEntry>>;

    /// F3: 采购清单 - "按供应商怎么下单"
    ///
    /// 基于 F2 的排序结果计算经济订货批量并按供应商聚合。
    ///
    /// # 返回
    /// - 成功: ShoppingList
    /// - 失败: 数据源故障
    async fn build_shopping_list(&self) -> ApiResult<ShoppingList>;
}
