// ==========================================
// 库存补货预测系统 - 预测参数配置
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.x 各引擎阈值
// 职责: 集中管理预测引擎的启发式阈值与业务占位常量
// 红线: 占位常量 (单价/订货成本/提前期) 非真实业务数据
// ==========================================

use serde::{Deserialize, Serialize};

/// 预测参数集 (可序列化, 支持 JSON 覆写)
///
/// 所有字段均有默认值,与引擎规格中的启发式阈值一一对应。
/// 这些阈值是行为兼容性约定,不是校准过的统计量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParameters {
    /// 回看窗口 (天)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// 扩展回看窗口 (天, 记录不足时加宽)
    #[serde(default = "default_extended_lookback_days")]
    pub extended_lookback_days: i64,

    /// 触发窗口加宽的最少记录数
    #[serde(default = "default_min_window_records")]
    pub min_window_records: usize,

    /// 可用分析的最少记录数 (不足则输出中性画像)
    #[serde(default = "default_min_usable_records")]
    pub min_usable_records: usize,

    /// 季节性判定阈值 (max|factor-1| 超过即视为季节性)
    #[serde(default = "default_seasonality_threshold")]
    pub seasonality_threshold: f64,

    /// 季节性判定所需最少自然月数
    #[serde(default = "default_min_seasonal_months")]
    pub min_seasonal_months: usize,

    /// 周期检测所需最少有序样本数
    #[serde(default = "default_autocorr_min_samples")]
    pub autocorr_min_samples: usize,

    /// 自相关系数接受阈值
    #[serde(default = "default_autocorr_threshold")]
    pub autocorr_threshold: f64,

    /// 趋势判定阈值 (百分比, 前后半段均值差超过即非平稳)
    #[serde(default = "default_trend_threshold_pct")]
    pub trend_threshold_pct: f64,

    /// 乐观情景速率系数
    #[serde(default = "default_optimistic_rate_factor")]
    pub optimistic_rate_factor: f64,

    /// 悲观情景速率系数
    #[serde(default = "default_pessimistic_rate_factor")]
    pub pessimistic_rate_factor: f64,

    /// 默认补货提前期 (天)
    #[serde(default = "default_lead_time_days")]
    pub default_lead_time_days: i64,

    /// 安全库存系数
    #[serde(default = "default_safety_stock_factor")]
    pub safety_stock_factor: f64,

    /// 默认最低库存阈值 (产品未设置 min_quantity 时)
    #[serde(default = "default_min_quantity")]
    pub default_min_quantity: i64,

    /// 单价占位常量 (产品缺单价时使用; 真实定价属外部服务)
    #[serde(default = "default_unit_price_fallback")]
    pub unit_price_fallback: f64,

    /// 单次订货固定成本 (EOQ 占位常量)
    #[serde(default = "default_order_cost")]
    pub order_cost: f64,

    /// 单位持有成本 (EOQ 占位常量)
    #[serde(default = "default_holding_cost")]
    pub holding_cost_per_unit: f64,

    /// 批量查询的并发上限 (数据源扇出)
    #[serde(default = "default_fan_out_limit")]
    pub fan_out_limit: usize,
}

fn default_lookback_days() -> i64 {
    90
}

fn default_extended_lookback_days() -> i64 {
    180
}

fn default_min_window_records() -> usize {
    5
}

fn default_min_usable_records() -> usize {
    3
}

fn default_seasonality_threshold() -> f64 {
    0.2
}

fn default_min_seasonal_months() -> usize {
    3
}

fn default_autocorr_min_samples() -> usize {
    12
}

fn default_autocorr_threshold() -> f64 {
    0.3
}

fn default_trend_threshold_pct() -> f64 {
    10.0
}

fn default_optimistic_rate_factor() -> f64 {
    0.8
}

fn default_pessimistic_rate_factor() -> f64 {
    1.3
}

fn default_lead_time_days() -> i64 {
    14
}

fn default_safety_stock_factor() -> f64 {
    1.2
}

fn default_min_quantity() -> i64 {
    5
}

fn default_unit_price_fallback() -> f64 {
    10.0
}

fn default_order_cost() -> f64 {
    50.0
}

fn default_holding_cost() -> f64 {
    2.0
}

fn default_fan_out_limit() -> usize {
    8
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            extended_lookback_days: default_extended_lookback_days(),
            min_window_records: default_min_window_records(),
            min_usable_records: default_min_usable_records(),
            seasonality_threshold: default_seasonality_threshold(),
            min_seasonal_months: default_min_seasonal_months(),
            autocorr_min_samples: default_autocorr_min_samples(),
            autocorr_threshold: default_autocorr_threshold(),
            trend_threshold_pct: default_trend_threshold_pct(),
            optimistic_rate_factor: default_optimistic_rate_factor(),
            pessimistic_rate_factor: default_pessimistic_rate_factor(),
            default_lead_time_days: default_lead_time_days(),
            safety_stock_factor: default_safety_stock_factor(),
            default_min_quantity: default_min_quantity(),
            unit_price_fallback: default_unit_price_fallback(),
            order_cost: default_order_cost(),
            holding_cost_per_unit: default_holding_cost(),
            fan_out_limit: default_fan_out_limit(),
        }
    }
}
