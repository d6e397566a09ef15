// ==========================================
// 库存补货预测系统 - 时序画像与预测情景
// ==========================================
// 依据: Forecast_Engine_Specs_v0.1.md - 4.1/4.2
// 职责: TemporalAnalyzer / ConsumptionForecaster 的输出载体
// 红线: 派生对象,不落库,每次调用重新计算
// ==========================================

use crate::domain::types::{CyclePattern, ScenarioKind, TrendDirection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 时序画像 (Temporal Profile)
// ==========================================

/// 时序画像
///
/// 从月度聚合的出库历史推导: 季节性 + 周期形态 + 趋势。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalProfile {
    /// 是否存在季节性 (max|factor-1| > 阈值, 且覆盖 >= 3 个自然月)
    pub seasonal: bool,

    /// 季节因子 (自然月 1-12 → 因子, 月均值/总体均值)
    pub seasonal_factors: HashMap<u32, f64>,

    /// 周期形态
    pub cycle: CyclePattern,

    /// 趋势方向
    pub trend: TrendDirection,

    /// 趋势速率 (百分比, 前后半段均值差)
    pub trend_rate_pct: f64,

    /// 参与分析的出库记录数
    pub sample_count: usize,
}

impl TemporalProfile {
    /// 数据不足时的中性画像
    ///
    /// 无季节性 / 无周期 / 平稳趋势,下游按低置信度处理。
    pub fn neutral() -> Self {
        Self {
            seasonal: false,
            seasonal_factors: HashMap::new(),
            cycle: CyclePattern::Irregular,
            trend: TrendDirection::Stable,
            trend_rate_pct: 0.0,
            sample_count: 0,
        }
    }

    /// 查询某自然月的季节因子,缺失时返回 1.0
    pub fn factor_for_month(&self, month: u32) -> f64 {
        self.seasonal_factors.get(&month).copied().unwrap_or(1.0)
    }

    /// 是否存在非平稳趋势
    pub fn is_trending(&self) -> bool {
        self.trend != TrendDirection::Stable
    }
}

// ==========================================
// 预测情景 (Forecast Scenario)
// ==========================================

/// 单一预测情景
///
/// days_remaining 为 None 当且仅当该情景消费速率为 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastScenario {
    /// 情景类型
    pub kind: ScenarioKind,

    /// 该情景下的日消费速率
    pub daily_rate: f64,

    /// 剩余天数 (floor(quantity / daily_rate))
    pub days_remaining: Option<i64>,

    /// 预计耗尽日期
    pub depletion_date: Option<NaiveDate>,

    /// 情景概率 (0-1, 启发式权重, 非校准概率)
    pub probability: f64,

    /// 预期偏差
    pub expected_deviation: f64,
}

// ==========================================
// 消费预测 (Consumption Forecast)
// ==========================================

/// 消费预测结果: 基线/调整速率 + 三情景
///
/// scenarios 为空当且仅当调整后速率 <= 0 (终态"不会耗尽")。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionForecast {
    /// 基线日消费速率 (窗口出库总量 / 窗口天数)
    pub baseline_rate: f64,

    /// 调整后日消费速率 (季节因子 x 趋势修正)
    pub adjusted_rate: f64,

    /// 预测情景集 (现实/乐观/悲观)
    pub scenarios: Vec<ForecastScenario>,
}

impl ConsumptionForecast {
    /// 零消费终态: 无情景,不会耗尽
    pub fn no_depletion(baseline_rate: f64) -> Self {
        Self {
            baseline_rate,
            adjusted_rate: 0.0,
            scenarios: Vec::new(),
        }
    }

    /// 按类型取情景
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&ForecastScenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }

    /// 现实情景 (下游主要消费对象)
    pub fn realistic(&self) -> Option<&ForecastScenario> {
        self.scenario(ScenarioKind::Realistic)
    }

    /// 悲观情景 (耗尽概率推导使用)
    pub fn pessimistic(&self) -> Option<&ForecastScenario> {
        self.scenario(ScenarioKind::Pessimistic)
    }
}
