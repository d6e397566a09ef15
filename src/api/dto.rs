// ==========================================
// 库存补货预测系统 - ForecastApi DTO 定义
// ==========================================
// 职责: 定义面向外层应用的序列化视图
// 约定: 日期一律 ISO 字符串 (YYYY-MM-DD), 等级一律 SCREAMING 字符串
// ==========================================

use crate::domain::prediction::{
    PredictionResult, PriorityEntry, ShoppingList, ShoppingListItem, SupplierGroup,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// F1: forecast_product - 缺货预测视图
// ==========================================

/// 缺货预测 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResultDto {
    /// 产品 ID
    pub product_id: String,

    /// 剩余天数 (零消费时缺省)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,

    /// 预计耗尽日期 (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depletion_date: Option<String>,

    /// 日消费速率
    pub daily_consumption: f64,

    /// 置信度 ("LOW" | "MEDIUM" | "HIGH")
    pub confidence: String,

    /// 是否需要采购
    pub needs_purchase: bool,

    /// 建议采购数量
    pub recommended_qty: i64,

    /// 安全库存
    pub safety_stock: i64,

    /// 未来 6 个月消费投影 (自然月 → 预计数量)
    pub monthly_projection: HashMap<u32, f64>,

    /// 预估采购成本
    pub estimated_cost: f64,

    /// 耗尽概率 (0-1)
    pub depletion_probability: f64,

    /// 优先级分数 (1-10)
    pub priority_score: u8,

    /// 分级原因 (JSON)
    pub reason: String,
}

impl From<PredictionResult> for PredictionResultDto {
    fn from(result: PredictionResult) -> Self {
        Self {
            product_id: result.product_id,
            days_remaining: result.days_remaining,
            depletion_date: result.depletion_date.map(|d| d.to_string()),
            daily_consumption: result.daily_consumption,
            confidence: result.confidence.to_string(),
            needs_purchase: result.needs_purchase,
            recommended_qty: result.recommended_qty,
            safety_stock: result.safety_stock,
            monthly_projection: result.monthly_projection,
            estimated_cost: result.estimated_cost,
            depletion_probability: result.depletion_probability,
            priority_score: result.priority_score,
            reason: result.reason,
        }
    }
}

// ==========================================
// F2: rank_priority_products - 优先级条目视图
// ==========================================

/// 优先级条目 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityEntryDto {
    /// 产品 ID
    pub product_id: String,

    /// 产品编码
    pub code: String,

    /// 产品名称
    pub name: String,

    /// 当前在库数量
    pub quantity: i64,

    /// 紧急等级 ("HIGH" | "MEDIUM" | "LOW")
    pub urgency: String,

    /// 剩余天数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,

    /// 建议采购数量
    pub recommended_qty: i64,

    /// 供应商
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// 预估补货提前期 (天)
    pub lead_time_days: i64,

    /// 分类
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// 采购分组 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_group: Option<String>,

    /// 优先级分数 (1-10)
    pub priority_score: u8,

    /// 建议措施 (本地化文案)
    pub suggested_action: String,

    /// 紧急等级判定原因 (JSON)
    pub urgency_reason: String,
}

impl From<PriorityEntry> for PriorityEntryDto {
    fn from(entry: PriorityEntry) -> Self {
        Self {
            product_id: entry.product_id,
            code: entry.code,
            name: entry.name,
            quantity: entry.quantity,
            urgency: entry.urgency.to_string(),
            days_remaining: entry.days_remaining,
            recommended_qty: entry.recommended_qty,
            supplier: entry.supplier,
            lead_time_days: entry.lead_time_days,
            category: entry.category,
            purchase_group: entry.purchase_group,
            priority_score: entry.priority_score,
            suggested_action: entry.suggested_action,
            urgency_reason: entry.urgency_reason,
        }
    }
}

// ==========================================
// F3: build_shopping_list - 采购清单视图
// ==========================================

/// 采购清单行 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItemDto {
    /// 产品 ID
    pub product_id: String,

    /// 产品名称
    pub name: String,

    /// 供应商
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// 紧急等级
    pub urgency: String,

    /// 建议采购数量
    pub recommended_qty: i64,

    /// 最终批量 (max(EOQ, 建议数量))
    pub lot_size: i64,

    /// 单价
    pub unit_price: f64,

    /// 行金额
    pub line_value: f64,

    /// 采购分组 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_group: Option<String>,
}

impl From<ShoppingListItem> for ShoppingListItemDto {
    fn from(item: ShoppingListItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            supplier: item.supplier,
            urgency: item.urgency.to_string(),
            recommended_qty: item.recommended_qty,
            lot_size: item.lot_size,
            unit_price: item.unit_price,
            line_value: item.line_value,
            purchase_group: item.purchase_group,
        }
    }
}

/// 供应商分组 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierGroupDto {
    /// 供应商名称
    pub supplier: String,

    /// 组内产品 ID 列表
    pub product_ids: Vec<String>,

    /// 组内金额合计
    pub total_value: f64,

    /// 组内最高紧急等级
    pub max_urgency: String,
}

impl From<SupplierGroup> for SupplierGroupDto {
    fn from(group: SupplierGroup) -> Self {
        Self {
            supplier: group.supplier,
            product_ids: group.product_ids,
            total_value: group.total_value,
            max_urgency: group.max_urgency.to_string(),
        }
    }
}

/// 采购清单 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListDto {
    /// 生成日期 (YYYY-MM-DD)
    pub generated_on: String,

    /// 清单行
    pub items: Vec<ShoppingListItemDto>,

    /// 行数
    pub total_items: usize,

    /// 供应商分组
    pub supplier_groups: HashMap<String, SupplierGroupDto>,

    /// 清单金额合计
    pub total_value: f64,

    /// 合并下单预估节约 (仅为正时输出)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<f64>,
}

impl From<ShoppingList> for ShoppingListDto {
    fn from(list: ShoppingList) -> Self {
        Self {
            generated_on: list.generated_on.to_string(),
            items: list.items.into_iter().map(Into::into).collect(),
            total_items: list.total_items,
            supplier_groups: list
                .supplier_groups
                .into_iter()
                .map(|(supplier, group)| (supplier, group.into()))
                .collect(),
            total_value: list.total_value,
            estimated_savings: list.estimated_savings,
        }
    }
}
