// ==========================================
// 库存补货预测系统 - 产品主数据
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 3. 数据模型
// 红线: 产品数量由外部库存事务维护,引擎只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 产品主数据
///
/// quantity 为当前在库数量; min_quantity 为人工设定的最低库存阈值,
/// 缺省时由引擎按消费速率推导 (见 StockoutPredictor)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 产品 ID
    pub product_id: String,

    /// 产品编码 (条码/内部码)
    pub code: String,

    /// 产品名称
    pub name: String,

    /// 当前在库数量
    pub quantity: i64,

    /// 最低库存阈值 (可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<i64>,

    /// 供应商名称 (可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// 分类 (可选)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// 单价 (可选, 缺省使用配置占位常量)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl Product {
    /// 创建新的产品 (最小字段集)
    pub fn new(product_id: String, code: String, name: String, quantity: i64) -> Self {
        Self {
            product_id,
            code,
            name,
            quantity,
            min_quantity: None,
            supplier: None,
            category: None,
            unit_price: None,
        }
    }

    /// 建构器: 设置最低库存阈值
    pub fn with_min_quantity(mut self, min_quantity: i64) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    /// 建构器: 设置供应商
    pub fn with_supplier(mut self, supplier: &str) -> Self {
        self.supplier = Some(supplier.to_string());
        self
    }

    /// 建构器: 设置分类
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// 建构器: 设置单价
    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// 是否已跌破人工最低库存阈值
    pub fn below_min_quantity(&self, default_min: i64) -> bool {
        self.quantity <= self.min_quantity.unwrap_or(default_min)
    }
}
