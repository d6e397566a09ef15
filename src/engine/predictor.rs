// ==========================================
// 库存补货预测系统 - 缺货预测引擎
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.3 Stockout Predictor
// 红线: 对调用方永不抛错,数据缺失降级为中性低置信结果
// 红线: priority_score 恒在 [1,10], 所有分级输出 reason
// ==========================================
// 职责: 剩余天数 + 置信度 + 月度投影 + 安全库存 + 建议采购量 + 优先级分数
// 输入: 产品主数据 + 移动记录快照
// 输出: PredictionResult
// ==========================================

use crate::config::ForecastParameters;
use crate::domain::movement::MovementRecord;
use crate::domain::prediction::PredictionResult;
use crate::domain::product::Product;
use crate::domain::profile::{ConsumptionForecast, TemporalProfile};
use crate::domain::types::{Confidence, CyclePattern};
use crate::engine::forecaster::ConsumptionForecaster;
use crate::engine::temporal::TemporalAnalyzer;
use chrono::{Datelike, Duration, NaiveDate};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

// 月度投影跨度 (月)
const PROJECTION_MONTHS: u32 = 6;
// 建议采购量的消费投影跨度 (天)
const PROJECTION_DAYS: i64 = 60;
// 零消费分档的优先级分数
const PRIORITY_ZERO_NEEDS: u8 = 8;
const PRIORITY_ZERO_OK: u8 = 2;

// ==========================================
// StockoutPredictor - 缺货预测引擎
// ==========================================
pub struct StockoutPredictor {
    analyzer: TemporalAnalyzer,
    forecaster: ConsumptionForecaster,
}

impl StockoutPredictor {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            analyzer: TemporalAnalyzer::new(),
            forecaster: ConsumptionForecaster::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单产品缺货预测
    ///
    /// 移动记录为空或格式不足时走降级路径 (中性画像 → 零消费分支),
    /// 本方法对调用方永不返回错误。
    ///
    /// # 步骤
    /// 1. 选窗口 → 时序画像 → 消费预测
    /// 2. 零消费 → 阈值分支
    /// 3. 正常 → 置信度/投影/安全库存/建议量/优先级
    #[instrument(skip(self, product, movements, params), fields(product_id = %product.product_id))]
    pub fn predict(
        &self,
        product: &Product,
        movements: &[MovementRecord],
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> PredictionResult {
        // 1. 时序分析与消费预测
        let window = self.analyzer.select_window(movements, today, params);
        let profile = self.analyzer.analyze(&window, params);
        let forecast = self
            .forecaster
            .forecast(product.quantity, &window, &profile, today, params);

        if forecast.scenarios.is_empty() {
            // 2. 零消费分支
            if movements.is_empty() {
                warn!(product_id = %product.product_id, "no movement history, degraded prediction");
            }
            self.predict_zero_consumption(product, &profile, &forecast, today, params)
        } else {
            // 3. 正常分支
            self.predict_normal(product, &profile, &forecast, today, params)
        }
    }

    // ==========================================
    // 零消费分支 (依据 Forecast_Engine_Specs 4.3)
    // ==========================================

    /// 零消费终态
    ///
    /// 无耗尽日期,判定无歧义 → 置信度 High;
    /// 采购判定退化为人工最低库存阈值比较。
    fn predict_zero_consumption(
        &self,
        product: &Product,
        profile: &TemporalProfile,
        forecast: &ConsumptionForecast,
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> PredictionResult {
        let effective_min = product.min_quantity.unwrap_or(params.default_min_quantity);
        let needs_purchase = product.quantity <= effective_min;

        // 补到 2 倍阈值
        let recommended_qty = if needs_purchase {
            (2 * effective_min - product.quantity).max(0)
        } else {
            0
        };

        let priority_score = if needs_purchase {
            PRIORITY_ZERO_NEEDS
        } else {
            PRIORITY_ZERO_OK
        };

        let unit_price = product.unit_price.unwrap_or(params.unit_price_fallback);

        // 零消费 → 未来 6 个月投影为 0
        let monthly_projection: HashMap<u32, f64> = (0..PROJECTION_MONTHS)
            .map(|offset| (month_after(today, offset), 0.0))
            .collect();

        let reason = json!({
            "branch": "ZERO_CONSUMPTION",
            "quantity": product.quantity,
            "effective_min_quantity": effective_min,
            "needs_purchase": needs_purchase,
        })
        .to_string();

        PredictionResult {
            product_id: product.product_id.clone(),
            days_remaining: None,
            depletion_date: None,
            daily_consumption: 0.0,
            confidence: Confidence::High,
            needs_purchase,
            recommended_qty,
            safety_stock: 0,
            monthly_projection,
            estimated_cost: recommended_qty as f64 * unit_price,
            depletion_probability: self.depletion_probability(forecast),
            priority_score,
            trend: profile.trend,
            trend_rate_pct: profile.trend_rate_pct,
            reason,
        }
    }

    // ==========================================
    // 正常分支
    // ==========================================

    fn predict_normal(
        &self,
        product: &Product,
        profile: &TemporalProfile,
        forecast: &ConsumptionForecast,
        today: NaiveDate,
        params: &ForecastParameters,
    ) -> PredictionResult {
        let realistic = forecast.realistic();
        let days_remaining = realistic.and_then(|s| s.days_remaining);
        let depletion_date = realistic.and_then(|s| s.depletion_date);

        // 置信度: 样本量 + 周期形态
        let confidence = self.classify_confidence(profile);

        // 月度投影 (未来 6 个月)
        let monthly_projection = self.monthly_projection(profile, forecast.baseline_rate, today);

        // 安全库存 = ceil(调整速率 x 提前期 x 安全系数)
        let lead_time = params.default_lead_time_days;
        let safety_stock =
            (forecast.adjusted_rate * lead_time as f64 * params.safety_stock_factor).ceil() as i64;

        // 采购判定: 在库 <= 安全库存, 或剩余天数进入提前期缓冲区
        let within_lead_buffer = days_remaining.map_or(false, |d| d <= lead_time + 7);
        let needs_purchase = product.quantity <= safety_stock || within_lead_buffer;

        // 未来 60 天消费投影 (逐日季节因子 + 按日缩放的趋势修正)
        let projected_60 = self.projected_consumption(profile, forecast.baseline_rate, today);

        // 建议采购量
        let effective_min = product
            .min_quantity
            .unwrap_or_else(|| (forecast.adjusted_rate * 30.0).ceil() as i64);
        let gap_driven = (projected_60 - product.quantity as f64 + safety_stock as f64).ceil() as i64;
        let min_driven = (effective_min - product.quantity).max(0);
        let recommended_qty = gap_driven.max(min_driven).max(0);

        let unit_price = product.unit_price.unwrap_or(params.unit_price_fallback);

        let priority_score = self.priority_score(
            days_remaining,
            product.quantity,
            safety_stock,
            effective_min,
            lead_time,
            confidence,
        );

        debug!(
            product_id = %product.product_id,
            ?days_remaining,
            safety_stock,
            recommended_qty,
            priority_score,
            "prediction computed"
        );

        let reason = json!({
            "branch": "NORMAL",
            "days_remaining": days_remaining,
            "safety_stock": safety_stock,
            "within_lead_buffer": within_lead_buffer,
            "projected_consumption_60d": projected_60,
            "effective_min_quantity": effective_min,
        })
        .to_string();

        PredictionResult {
            product_id: product.product_id.clone(),
            days_remaining,
            depletion_date,
            daily_consumption: forecast.adjusted_rate,
            confidence,
            needs_purchase,
            recommended_qty,
            safety_stock,
            monthly_projection,
            estimated_cost: recommended_qty as f64 * unit_price,
            depletion_probability: self.depletion_probability(forecast),
            priority_score,
            trend: profile.trend,
            trend_rate_pct: profile.trend_rate_pct,
            reason,
        }
    }

    // ==========================================
    // 分级与投影
    // ==========================================

    /// 置信度分档
    ///
    /// 样本 > 15 且周期非 Irregular → High; 样本 > 8 → Medium; 其余 Low。
    fn classify_confidence(&self, profile: &TemporalProfile) -> Confidence {
        if profile.sample_count > 15 && profile.cycle != CyclePattern::Irregular {
            Confidence::High
        } else if profile.sample_count > 8 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// 未来 6 个月消费投影
    ///
    /// 每月 = 基线 x 30 x 该月季节因子 x 趋势修正 (按月偏移缩放)
    fn monthly_projection(
        &self,
        profile: &TemporalProfile,
        baseline_rate: f64,
        today: NaiveDate,
    ) -> HashMap<u32, f64> {
        (0..PROJECTION_MONTHS)
            .map(|offset| {
                let month = month_after(today, offset);
                let trend_adj = if profile.is_trending() {
                    1.0 + (profile.trend_rate_pct / 100.0) * ((offset + 1) as f64
                        / PROJECTION_MONTHS as f64)
                } else {
                    1.0
                };
                let qty =
                    (baseline_rate * 30.0 * profile.factor_for_month(month) * trend_adj).max(0.0);
                (month, qty)
            })
            .collect()
    }

    /// 未来 60 天消费总量投影
    ///
    /// 逐日累加: 基线 x 当日所在月季节因子 x 按日缩放的趋势修正
    fn projected_consumption(
        &self,
        profile: &TemporalProfile,
        baseline_rate: f64,
        today: NaiveDate,
    ) -> f64 {
        (1..=PROJECTION_DAYS)
            .map(|day| {
                let date = today + Duration::days(day);
                let trend_adj = if profile.is_trending() {
                    1.0 + (profile.trend_rate_pct / 100.0) * (day as f64 / PROJECTION_DAYS as f64)
                } else {
                    1.0
                };
                (baseline_rate * profile.factor_for_month(date.month()) * trend_adj).max(0.0)
            })
            .sum()
    }

    /// 耗尽概率 (悲观情景推导)
    ///
    /// 悲观剩余 < 30 天: (1 - days/30) x 悲观概率;
    /// 否则悲观概率 x 0.5; 情景缺失时取 0.5。
    fn depletion_probability(&self, forecast: &ConsumptionForecast) -> f64 {
        match forecast.pessimistic() {
            Some(p) => match p.days_remaining {
                Some(d) if d < 30 => (1.0 - d as f64 / 30.0) * p.probability,
                _ => p.probability * 0.5,
            },
            None => 0.5,
        }
    }

    /// 优先级分数 (1-10)
    ///
    /// 剩余天数阶梯: <=7→10, <=14→9, <=提前期→8, <=30→7, <=60→5, 其余→3;
    /// 无剩余天数时按 在库 vs 最低阈值/安全库存 取 6/4/2;
    /// 置信度 Low 时 +1, 上限 10。
    fn priority_score(
        &self,
        days_remaining: Option<i64>,
        quantity: i64,
        safety_stock: i64,
        effective_min: i64,
        lead_time: i64,
        confidence: Confidence,
    ) -> u8 {
        let base: u8 = match days_remaining {
            Some(d) if d <= 7 => 10,
            Some(d) if d <= 14 => 9,
            Some(d) if d <= lead_time => 8,
            Some(d) if d <= 30 => 7,
            Some(d) if d <= 60 => 5,
            Some(_) => 3,
            None => {
                if quantity <= effective_min {
                    6
                } else if quantity <= safety_stock {
                    4
                } else {
                    2
                }
            }
        };

        let bumped = if confidence == Confidence::Low {
            base.saturating_add(1).min(10)
        } else {
            base
        };

        bumped.clamp(1, 10)
    }
}

/// 今天起第 offset 个自然月的月份 (1-12)
fn month_after(today: NaiveDate, offset: u32) -> u32 {
    (today.month0() + offset) % 12 + 1
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for StockoutPredictor {
    fn default() -> Self {
        Self::new()
    }
}
