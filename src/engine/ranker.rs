// ==========================================
// 库存补货预测系统 - 优先级排序引擎
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.4 Priority Ranker
// 红线: 紧急等级是阈值判定的确定性函数,不得临场指派
// 红线: 供应商提前期为稳定散列占位值,非真实主数据
// ==========================================
// 职责: 紧急等级判定 + 提前期估计 + 采购分组 + 跨产品排序
// 输入: (产品, 预测结果) 列表
// 输出: Vec<PriorityEntry> (紧急在前)
// ==========================================

use crate::config::ForecastParameters;
use crate::domain::prediction::{PredictionResult, PriorityEntry};
use crate::domain::product::Product;
use crate::domain::types::Urgency;
use crate::i18n;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;
use tracing::instrument;

// 采购分组的最少同供应商待采产品数
const PURCHASE_GROUP_MIN_PRODUCTS: usize = 3;

// ==========================================
// PriorityRanker - 优先级排序引擎
// ==========================================
pub struct PriorityRanker {
    // 无状态引擎
}

impl PriorityRanker {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 跨产品优先级排序
    ///
    /// # 步骤
    /// 1. 逐产品判定紧急等级与提前期
    /// 2. 统计同供应商待采产品数,分配采购分组
    /// 3. 五键排序: 紧急等级 → 剩余天数 → 采购分组 → 供应商 → 分类
    /// 4. 过滤建议量为 0 的低紧急条目
    #[instrument(skip(self, items, params), fields(count = items.len()))]
    pub fn rank(
        &self,
        items: &[(Product, PredictionResult)],
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> Vec<PriorityEntry> {
        // 1. 逐产品构造条目
        let mut entries: Vec<(PriorityEntry, bool)> = items
            .iter()
            .map(|(product, prediction)| {
                let entry = self.build_entry(product, prediction, params);
                (entry, prediction.needs_purchase)
            })
            .collect();

        // 2. 同供应商 >= 3 个待采产品 → 分配采购分组
        let mut pending_per_supplier: HashMap<String, usize> = HashMap::new();
        for (entry, needs_purchase) in &entries {
            if *needs_purchase {
                if let Some(supplier) = &entry.supplier {
                    *pending_per_supplier.entry(supplier.clone()).or_insert(0) += 1;
                }
            }
        }
        for (entry, needs_purchase) in &mut entries {
            if !*needs_purchase {
                continue;
            }
            if let Some(supplier) = &entry.supplier {
                if pending_per_supplier.get(supplier).copied().unwrap_or(0)
                    >= PURCHASE_GROUP_MIN_PRODUCTS
                {
                    entry.purchase_group = Some(format!("{}-{}", supplier, today));
                }
            }
        }

        let mut entries: Vec<PriorityEntry> = entries.into_iter().map(|(e, _)| e).collect();

        // 3. 五键排序 (字符串键按字典序)
        entries.sort_by(|a, b| {
            let key = |e: &PriorityEntry| {
                (
                    e.urgency.sort_rank(),
                    e.days_remaining.unwrap_or(i64::MAX),
                    e.purchase_group.clone().unwrap_or_default(),
                    e.supplier.clone().unwrap_or_default(),
                    e.category.clone().unwrap_or_default(),
                )
            };
            key(a).cmp(&key(b))
        });

        // 4. 低紧急且建议量为 0 的条目无行动意义
        entries.retain(|e| !(e.urgency == Urgency::Low && e.recommended_qty == 0));

        entries
    }

    // ==========================================
    // 条目构造
    // ==========================================

    fn build_entry(
        &self,
        product: &Product,
        prediction: &PredictionResult,
        params: &ForecastParameters,
    ) -> PriorityEntry {
        let (urgency, urgency_reason) = self.classify_urgency(product, prediction, params);

        let lead_time_days = match &product.supplier {
            Some(supplier) => self.estimate_lead_time(supplier),
            None => params.default_lead_time_days,
        };

        PriorityEntry {
            product_id: product.product_id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            quantity: product.quantity,
            urgency,
            days_remaining: prediction.days_remaining,
            recommended_qty: prediction.recommended_qty,
            supplier: product.supplier.clone(),
            lead_time_days,
            category: product.category.clone(),
            purchase_group: None, // 分组在全量统计后再分配
            priority_score: prediction.priority_score,
            trend: prediction.trend,
            trend_rate_pct: prediction.trend_rate_pct,
            suggested_action: self.suggested_action(urgency),
            urgency_reason,
        }
    }

    /// 紧急等级判定
    ///
    /// 规则 (顺序执行,命中即返回):
    /// 1) 剩余天数 <= 7, 或无预测且在库为 0 → High
    /// 2) 剩余天数 <= 14, 或无预测且在库 <= 最低阈值 → Medium
    /// 3) 其他 → Low
    fn classify_urgency(
        &self,
        product: &Product,
        prediction: &PredictionResult,
        params: &ForecastParameters,
    ) -> (Urgency, String) {
        let effective_min = product.min_quantity.unwrap_or(params.default_min_quantity);

        let (urgency, rule) = match prediction.days_remaining {
            Some(d) if d <= 7 => (Urgency::High, "DAYS_WITHIN_7"),
            Some(d) if d <= 14 => (Urgency::Medium, "DAYS_WITHIN_14"),
            Some(_) => (Urgency::Low, "DAYS_BEYOND_14"),
            None if product.quantity == 0 => (Urgency::High, "NO_FORECAST_EMPTY_STOCK"),
            None if product.quantity <= effective_min => {
                (Urgency::Medium, "NO_FORECAST_BELOW_MIN")
            }
            None => (Urgency::Low, "NO_FORECAST_STOCK_OK"),
        };

        let reason = json!({
            "rule": rule,
            "days_remaining": prediction.days_remaining,
            "quantity": product.quantity,
            "effective_min_quantity": effective_min,
        })
        .to_string();

        (urgency, reason)
    }

    /// 供应商提前期估计 (占位)
    ///
    /// 供应商名 FNV-1a 稳定散列映射到 [7,16] 天。
    /// 同名供应商恒得同一估计值,保证排序与分组确定性。
    fn estimate_lead_time(&self, supplier: &str) -> i64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for byte in supplier.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }

        7 + (hash % 10) as i64
    }

    /// 建议措施文案 (本地化)
    fn suggested_action(&self, urgency: Urgency) -> String {
        match urgency {
            Urgency::High => i18n::t("priority.action.high"),
            Urgency::Medium => i18n::t("priority.action.medium"),
            Urgency::Low => i18n::t("priority.action.low"),
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PriorityRanker {
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
    use crate::domain::types::{Confidence, TrendDirection};
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn test_product(id: &str, quantity: i64, supplier: Option<&str>) -> Product {
        let mut p = Product::new(
            id.to_string(),
            format!("C-{}", id),
            format!("产品{}", id),
            quantity,
        );
        if let Some(s) = supplier {
            p = p.with_supplier(s);
        }
        p
    }

    fn test_prediction(
        id: &str,
        days_remaining: Option<i64>,
        recommended_qty: i64,
        needs_purchase: bool,
    ) -> PredictionResult {
        PredictionResult {
            product_id: id.to_string(),
            days_remaining,
            depletion_date: None,
            daily_consumption: 1.0,
            confidence: Confidence::Medium,
            needs_purchase,
            recommended_qty,
            safety_stock: 17,
            monthly_projection: HashMap::new(),
            estimated_cost: recommended_qty as f64 * 10.0,
            depletion_probability: 0.3,
            priority_score: 5,
            trend: TrendDirection::Stable,
            trend_rate_pct: 0.0,
            reason: String::new(),
        }
    }

    #[test]
    fn test_urgency_tiers() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        let cases = vec![
            (test_product("P1", 100, None), test_prediction("P1", Some(5), 10, true), Urgency::High),
            (test_product("P2", 100, None), test_prediction("P2", Some(10), 10, true), Urgency::Medium),
            (test_product("P3", 100, None), test_prediction("P3", Some(30), 10, true), Urgency::Low),
            (test_product("P4", 0, None), test_prediction("P4", None, 10, true), Urgency::High),
            (test_product("P5", 4, None), test_prediction("P5", None, 10, true), Urgency::Medium),
            (test_product("P6", 100, None), test_prediction("P6", None, 10, true), Urgency::Low),
        ];

        for (product, prediction, expected) in cases {
            let (urgency, _) = ranker.classify_urgency(&product, &prediction, &params);
            assert_eq!(urgency, expected, "product {}", product.product_id);
        }
    }

    #[test]
    fn test_high_urgency_sorts_first() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        let items = vec![
            (test_product("P1", 100, None), test_prediction("P1", Some(30), 10, true)),
            (test_product("P2", 100, None), test_prediction("P2", Some(5), 10, true)),
            (test_product("P3", 100, None), test_prediction("P3", Some(10), 10, true)),
        ];

        let ranked = ranker.rank(&items, today(), &params);

        assert_eq!(ranked[0].product_id, "P2");
        assert_eq!(ranked[1].product_id, "P3");
        assert_eq!(ranked[2].product_id, "P1");

        // 所有 High 均在 Medium/Low 之前
        let first_non_high = ranked.iter().position(|e| e.urgency != Urgency::High);
        if let Some(pos) = first_non_high {
            assert!(ranked[pos..].iter().all(|e| e.urgency != Urgency::High));
        }
    }

    #[test]
    fn test_days_remaining_null_sorts_last_within_tier() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        let items = vec![
            (test_product("P1", 100, None), test_prediction("P1", None, 10, true)),
            (test_product("P2", 100, None), test_prediction("P2", Some(30), 10, true)),
        ];

        let ranked = ranker.rank(&items, today(), &params);

        // 同为 Low: 有天数的在前, None 在后
        assert_eq!(ranked[0].product_id, "P2");
        assert_eq!(ranked[1].product_id, "P1");
    }

    #[test]
    fn test_purchase_group_assigned_at_three_products() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        let items = vec![
            (test_product("P1", 1, Some("供应商甲")), test_prediction("P1", Some(5), 10, true)),
            (test_product("P2", 1, Some("供应商甲")), test_prediction("P2", Some(6), 10, true)),
            (test_product("P3", 1, Some("供应商甲")), test_prediction("P3", Some(9), 10, true)),
            (test_product("P4", 1, Some("供应商乙")), test_prediction("P4", Some(5), 10, true)),
        ];

        let ranked = ranker.rank(&items, today(), &params);

        let expected_group = format!("供应商甲-{}", today());
        for id in ["P1", "P2", "P3"] {
            let entry = ranked.iter().find(|e| e.product_id == id).unwrap();
            assert_eq!(entry.purchase_group.as_deref(), Some(expected_group.as_str()));
        }
        // 不足 3 个的供应商不分组
        let p4 = ranked.iter().find(|e| e.product_id == "P4").unwrap();
        assert!(p4.purchase_group.is_none());
    }

    #[test]
    fn test_purchase_group_ignores_non_purchase_products() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        // 同供应商 3 个产品,但只有 2 个需要采购
        let items = vec![
            (test_product("P1", 1, Some("供应商甲")), test_prediction("P1", Some(5), 10, true)),
            (test_product("P2", 1, Some("供应商甲")), test_prediction("P2", Some(6), 10, true)),
            (test_product("P3", 100, Some("供应商甲")), test_prediction("P3", Some(90), 5, false)),
        ];

        let ranked = ranker.rank(&items, today(), &params);

        for entry in &ranked {
            assert!(entry.purchase_group.is_none(), "entry {}", entry.product_id);
        }
    }

    #[test]
    fn test_low_urgency_zero_qty_filtered() {
        let ranker = PriorityRanker::new();
        let params = ForecastParameters::default();

        let items = vec![
            (test_product("P1", 100, None), test_prediction("P1", Some(90), 0, false)),
            (test_product("P2", 100, None), test_prediction("P2", Some(5), 10, true)),
        ];

        let ranked = ranker.rank(&items, today(), &params);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product_id, "P2");
    }

    #[test]
    fn test_lead_time_stable_and_in_range() {
        let ranker = PriorityRanker::new();

        let first = ranker.estimate_lead_time("供应商甲");
        let second = ranker.estimate_lead_time("供应商甲");
        assert_eq!(first, second);
        assert!((7..=16).contains(&first));

        // 不同供应商允许不同估计值,但都在范围内
        for name in ["A", "B", "长名字供应商有限公司", "x"] {
            let lead = ranker.estimate_lead_time(name);
            assert!((7..=16).contains(&lead), "supplier {}", name);
        }
    }
}
