// ==========================================
// 库存补货预测系统 - 采购清单引擎
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.5 Procurement List Builder
// 红线: 订货成本/持有成本为占位常量,EOQ 为简化需求模型
// ==========================================
// 职责: 经济订货批量 + 供应商聚合 + 合并下单节约估计
// 输入: 排序后的优先级条目 + 单价查询
// 输出: ShoppingList
// ==========================================

use crate::config::ForecastParameters;
use crate::domain::prediction::{PriorityEntry, ShoppingList, ShoppingListItem, SupplierGroup};
use crate::domain::types::{TrendDirection, Urgency};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, instrument};

// ==========================================
// ProcurementListBuilder - 采购清单引擎
// ==========================================
pub struct ProcurementListBuilder {
    // 无状态引擎
}

impl ProcurementListBuilder {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 构建采购清单
    ///
    /// # 步骤
    /// 1. 逐条目计算年需求估计与 EOQ,最终批量 = max(EOQ, 建议量)
    /// 2. 按供应商聚合金额与最高紧急等级
    /// 3. 估计合并下单节约 (仅为正时输出)
    ///
    /// # 参数
    /// - `entries`: 排序后的优先级条目
    /// - `unit_prices`: 产品 ID → 单价 (缺失时用占位常量)
    /// - `today`: 生成日期
    #[instrument(skip(self, entries, unit_prices, params), fields(count = entries.len()))]
    pub fn build(
        &self,
        entries: &[PriorityEntry],
        unit_prices: &HashMap<String, f64>,
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> ShoppingList {
        // 1. 逐条目计算批量
        let mut items: Vec<ShoppingListItem> = Vec::new();
        for entry in entries {
            let lot_size = self.lot_size(entry, params);
            if lot_size == 0 {
                // 无采购量的条目不上清单
                debug!(product_id = %entry.product_id, "zero lot size, skipped");
                continue;
            }

            let unit_price = unit_prices
                .get(&entry.product_id)
                .copied()
                .unwrap_or(params.unit_price_fallback);

            items.push(ShoppingListItem {
                product_id: entry.product_id.clone(),
                name: entry.name.clone(),
                supplier: entry.supplier.clone(),
                urgency: entry.urgency,
                recommended_qty: entry.recommended_qty,
                lot_size,
                unit_price,
                line_value: lot_size as f64 * unit_price,
                purchase_group: entry.purchase_group.clone(),
            });
        }

        // 2. 供应商聚合
        let supplier_groups = self.aggregate_by_supplier(&items);

        // 3. 合并下单节约
        let total_value: f64 = items.iter().map(|item| item.line_value).sum();
        let estimated_savings = self.consolidation_savings(&items, &supplier_groups, params);

        ShoppingList {
            generated_on: today,
            total_items: items.len(),
            items,
            supplier_groups,
            total_value,
            estimated_savings,
        }
    }

    // ==========================================
    // 批量计算 (EOQ)
    // ==========================================

    /// 最终批量 = max(EOQ, 建议采购量)
    ///
    /// 年需求估计 ≈ 建议量 x 4, 按趋势二次修正:
    /// 增长全权重放大, 下降半权重缩小。
    fn lot_size(&self, entry: &PriorityEntry, params: &ForecastParameters) -> i64 {
        let mut annual_demand = entry.recommended_qty as f64 * 4.0;
        match entry.trend {
            TrendDirection::Growing => {
                annual_demand *= 1.0 + entry.trend_rate_pct / 100.0;
            }
            TrendDirection::Declining => {
                annual_demand *= 1.0 + entry.trend_rate_pct / 100.0 * 0.5;
            }
            TrendDirection::Stable => {}
        }
        let annual_demand = annual_demand.max(0.0);

        let eoq = self.economic_order_qty(annual_demand, params);
        eoq.max(entry.recommended_qty)
    }

    /// 经济订货批量
    ///
    /// EOQ = ceil(sqrt(2 x 年需求 x 订货成本 / 持有成本))
    fn economic_order_qty(&self, annual_demand: f64, params: &ForecastParameters) -> i64 {
        if annual_demand <= 0.0 || params.holding_cost_per_unit <= 0.0 {
            return 0;
        }
        (2.0 * annual_demand * params.order_cost / params.holding_cost_per_unit)
            .sqrt()
            .ceil() as i64
    }

    // ==========================================
    // 供应商聚合
    // ==========================================

    /// 按供应商聚合金额与最高紧急等级 (无供应商的条目不入组)
    fn aggregate_by_supplier(&self, items: &[ShoppingListItem]) -> HashMap<String, SupplierGroup> {
        let mut groups: HashMap<String, SupplierGroup> = HashMap::new();
        for item in items {
            let Some(supplier) = &item.supplier else {
                continue;
            };
            let group = groups
                .entry(supplier.clone())
                .or_insert_with(|| SupplierGroup {
                    supplier: supplier.clone(),
                    product_ids: Vec::new(),
                    total_value: 0.0,
                    max_urgency: Urgency::Low,
                });
            group.product_ids.push(item.product_id.clone());
            group.total_value += item.line_value;
            group.max_urgency = group.max_urgency.max(item.urgency);
        }
        groups
    }

    // ==========================================
    // 合并下单节约估计
    // ==========================================

    /// 节约 = (逐件下单金额 + 每件一次订货成本)
    ///        - (分组下单金额 + 每组一次订货成本)
    ///
    /// 无供应商的条目无法合并,按独立下单计。仅为正时输出。
    fn consolidation_savings(
        &self,
        items: &[ShoppingListItem],
        groups: &HashMap<String, SupplierGroup>,
        params: &ForecastParameters,
    ) -> Option<f64> {
        if items.is_empty() {
            return None;
        }

        let ungrouped = items.iter().filter(|item| item.supplier.is_none()).count();
        let individual_orders = items.len() as f64;
        let consolidated_orders = (groups.len() + ungrouped) as f64;

        // 金额两侧相同,差额来自订货次数
        let savings = params.order_cost * (individual_orders - consolidated_orders);
        if savings > 0.0 {
            Some(savings)
        } else {
            None
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ProcurementListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn test_entry(
        id: &str,
        recommended_qty: i64,
        supplier: Option<&str>,
        urgency: Urgency,
    ) -> PriorityEntry {
        PriorityEntry {
            product_id: id.to_string(),
            code: format!("C-{}", id),
            name: format!("产品{}", id),
            quantity: 5,
            urgency,
            days_remaining: Some(10),
            recommended_qty,
            supplier: supplier.map(|s| s.to_string()),
            lead_time_days: 14,
            category: None,
            purchase_group: None,
            priority_score: 7,
            trend: TrendDirection::Stable,
            trend_rate_pct: 0.0,
            suggested_action: String::new(),
            urgency_reason: String::new(),
        }
    }

    #[test]
    fn test_lot_size_at_least_recommended() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();

        for qty in [1, 10, 100, 5000] {
            let entry = test_entry("P1", qty, None, Urgency::Medium);
            assert!(builder.lot_size(&entry, &params) >= qty, "qty {}", qty);
        }
    }

    #[test]
    fn test_eoq_formula() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();

        // 年需求 40, 订货 50, 持有 2 → sqrt(2000) = 44.7 → 45
        assert_eq!(builder.economic_order_qty(40.0, &params), 45);
        assert_eq!(builder.economic_order_qty(0.0, &params), 0);
    }

    #[test]
    fn test_trend_adjusts_annual_demand() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();

        let mut growing = test_entry("P1", 10, None, Urgency::Medium);
        growing.trend = TrendDirection::Growing;
        growing.trend_rate_pct = 50.0;

        let mut declining = test_entry("P2", 10, None, Urgency::Medium);
        declining.trend = TrendDirection::Declining;
        declining.trend_rate_pct = -50.0;

        let stable = test_entry("P3", 10, None, Urgency::Medium);

        let growing_lot = builder.lot_size(&growing, &params);
        let stable_lot = builder.lot_size(&stable, &params);
        let declining_lot = builder.lot_size(&declining, &params);

        // 增长放大批量,下降 (半权重) 缩小批量
        assert!(growing_lot > stable_lot);
        assert!(declining_lot < stable_lot);
        assert!(declining_lot >= 10);
    }

    #[test]
    fn test_supplier_aggregation_sums_values() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();
        let mut prices = HashMap::new();
        prices.insert("P1".to_string(), 10.0);
        prices.insert("P2".to_string(), 5.0);
        prices.insert("P3".to_string(), 2.0);

        let entries = vec![
            test_entry("P1", 10, Some("供应商甲"), Urgency::High),
            test_entry("P2", 20, Some("供应商甲"), Urgency::Medium),
            test_entry("P3", 30, Some("供应商乙"), Urgency::Low),
        ];

        let list = builder.build(&entries, &prices, today(), &params);

        assert_eq!(list.total_items, 3);
        assert_eq!(list.supplier_count(), 2);

        let group_a = &list.supplier_groups["供应商甲"];
        assert_eq!(group_a.product_ids.len(), 2);
        assert_eq!(group_a.max_urgency, Urgency::High);

        // 组内金额 = 组内行金额之和
        let expected: f64 = list
            .items
            .iter()
            .filter(|item| item.supplier.as_deref() == Some("供应商甲"))
            .map(|item| item.line_value)
            .sum();
        assert!((group_a.total_value - expected).abs() < 1e-9);

        // 清单总额 = 全部行金额之和
        let total: f64 = list.items.iter().map(|i| i.line_value).sum();
        assert!((list.total_value - total).abs() < 1e-9);
    }

    #[test]
    fn test_consolidation_savings_positive_when_grouping_helps() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();
        let prices = HashMap::new();

        // 3 件同供应商: 3 次订货 → 1 次, 节约 2 x 订货成本
        let entries = vec![
            test_entry("P1", 10, Some("供应商甲"), Urgency::High),
            test_entry("P2", 10, Some("供应商甲"), Urgency::Medium),
            test_entry("P3", 10, Some("供应商甲"), Urgency::Low),
        ];

        let list = builder.build(&entries, &prices, today(), &params);

        let expected = params.order_cost * 2.0;
        assert!((list.estimated_savings.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_no_savings_when_one_item_per_supplier() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();
        let prices = HashMap::new();

        let entries = vec![
            test_entry("P1", 10, Some("供应商甲"), Urgency::High),
            test_entry("P2", 10, Some("供应商乙"), Urgency::Medium),
            test_entry("P3", 10, None, Urgency::Low),
        ];

        let list = builder.build(&entries, &prices, today(), &params);

        assert!(list.estimated_savings.is_none());
    }

    #[test]
    fn test_zero_qty_entries_skipped() {
        let builder = ProcurementListBuilder::new();
        let params = ForecastParameters::default();
        let prices = HashMap::new();

        let entries = vec![
            test_entry("P1", 0, Some("供应商甲"), Urgency::Medium),
            test_entry("P2", 10, Some("供应商甲"), Urgency::High),
        ];

        let list = builder.build(&entries, &prices, today(), &params);

        assert_eq!(list.total_items, 1);
        assert_eq!(list.items[0].product_id, "P2");
    }
}
