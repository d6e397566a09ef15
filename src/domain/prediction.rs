// ==========================================
// 库存补货预测系统 - 预测结果与采购清单
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.3/4.4/4.5
// 红线: priority_score 恒在 [1,10]; 所有分级必须输出 reason
// ==========================================

use crate::domain::types::{Confidence, TrendDirection, Urgency};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// 缺货预测结果 (Prediction Result)
// ==========================================

/// 单产品缺货预测结果
///
/// days_remaining 为 None 当且仅当日消费速率为 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 产品 ID
    pub product_id: String,

    /// 剩余天数
    pub days_remaining: Option<i64>,

    /// 预计耗尽日期
    pub depletion_date: Option<NaiveDate>,

    /// 日消费速率 (调整后)
    pub daily_consumption: f64,

    /// 预测置信度
    pub confidence: Confidence,

    /// 是否需要采购
    pub needs_purchase: bool,

    /// 建议采购数量
    pub recommended_qty: i64,

    /// 安全库存 (ceil(调整速率 x 提前期 x 安全系数))
    pub safety_stock: i64,

    /// 未来 6 个月消费投影 (自然月 → 预计数量)
    pub monthly_projection: HashMap<u32, f64>,

    /// 预估采购成本 (建议数量 x 单价占位常量)
    pub estimated_cost: f64,

    /// 耗尽概率 (悲观情景推导, 启发式)
    pub depletion_probability: f64,

    /// 优先级分数 (1-10, 10 最紧急)
    pub priority_score: u8,

    /// 趋势方向 (采购批量计算沿用)
    pub trend: TrendDirection,

    /// 趋势速率 (百分比)
    pub trend_rate_pct: f64,

    /// 分级原因 (JSON, 可解释性)
    pub reason: String,
}

impl PredictionResult {
    /// 是否为零消费终态 (历史窗口内无出库)
    pub fn is_no_depletion(&self) -> bool {
        self.days_remaining.is_none()
    }
}

// ==========================================
// 优先级排序条目 (Priority Entry)
// ==========================================

/// 补货优先级条目
///
/// 由 PriorityRanker 在产品间横向比较后产出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEntry {
    /// 产品 ID
    pub product_id: String,

    /// 产品编码
    pub code: String,

    /// 产品名称
    pub name: String,

    /// 当前在库数量
    pub quantity: i64,

    /// 紧急等级
    pub urgency: Urgency,

    /// 剩余天数
    pub days_remaining: Option<i64>,

    /// 建议采购数量
    pub recommended_qty: i64,

    /// 供应商 (可选)
    pub supplier: Option<String>,

    /// 预估补货提前期 (天, 供应商名稳定散列映射到 [7,16] 的占位值)
    pub lead_time_days: i64,

    /// 分类 (可选)
    pub category: Option<String>,

    /// 采购分组 ID (同供应商 >= 3 个待采产品时分配)
    pub purchase_group: Option<String>,

    /// 优先级分数 (1-10)
    pub priority_score: u8,

    /// 趋势方向 (采购批量计算沿用)
    pub trend: TrendDirection,

    /// 趋势速率 (百分比)
    pub trend_rate_pct: f64,

    /// 建议措施 (本地化文案)
    pub suggested_action: String,

    /// 紧急等级判定原因 (JSON)
    pub urgency_reason: String,
}

// ==========================================
// 采购清单 (Shopping List)
// ==========================================

/// 采购清单行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// 产品 ID
    pub product_id: String,

    /// 产品名称
    pub name: String,

    /// 供应商 (可选)
    pub supplier: Option<String>,

    /// 紧急等级
    pub urgency: Urgency,

    /// 建议采购数量 (预测引擎输出)
    pub recommended_qty: i64,

    /// 最终批量 (max(EOQ, 建议数量))
    pub lot_size: i64,

    /// 单价 (产品单价或占位常量)
    pub unit_price: f64,

    /// 行金额 (批量 x 单价)
    pub line_value: f64,

    /// 采购分组 ID
    pub purchase_group: Option<String>,
}

/// 供应商聚合分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierGroup {
    /// 供应商名称
    pub supplier: String,

    /// 组内产品 ID 列表
    pub product_ids: Vec<String>,

    /// 组内金额合计
    pub total_value: f64,

    /// 组内最高紧急等级
    pub max_urgency: Urgency,
}

/// 采购清单
///
/// estimated_savings 仅在合并下单确有节约时输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    /// 生成日期
    pub generated_on: NaiveDate,

    /// 清单行
    pub items: Vec<ShoppingListItem>,

    /// 行数
    pub total_items: usize,

    /// 供应商分组 (供应商名 → 分组)
    pub supplier_groups: HashMap<String, SupplierGroup>,

    /// 清单金额合计
    pub total_value: f64,

    /// 合并下单预估节约 (仅为正时输出)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<f64>,
}

impl ShoppingList {
    /// 供应商数量
    pub fn supplier_count(&self) -> usize {
        self.supplier_groups.len()
    }

    /// 清单内最高紧急等级
    pub fn max_urgency(&self) -> Option<Urgency> {
        self.items.iter().map(|item| item.urgency).max()
    }
}

impl fmt::Display for ShoppingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (items: {}, suppliers: {}, value: {:.2})",
            self.generated_on,
            self.total_items,
            self.supplier_count(),
            self.total_value
        )
    }
}
